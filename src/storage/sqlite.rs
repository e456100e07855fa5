//! SQLite row backend.
//!
//! Every logical table lives in one physical `rows` table holding the JSON
//! body plus the extracted partition and unique keys. The unique index on
//! `(table_name, unique_key)` enforces the per-table constraints.

use async_trait::async_trait;
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};
use sqlx::{Row as _, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::schema::{schema, Rows, CREATE_ROWS_TABLE};
use crate::feed::{ChangeFeed, ChangeKind, RowChange};
use crate::interfaces::{Filter, Result, Row, RowBackend, StoreError, Table};

/// SQLite implementation of RowBackend.
pub struct SqliteBackend {
    pool: SqlitePool,
    feed: ChangeFeed,
}

impl SqliteBackend {
    /// Create a new SQLite backend.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_feed(pool, ChangeFeed::default())
    }

    pub fn with_feed(pool: SqlitePool, feed: ChangeFeed) -> Self {
        Self { pool, feed }
    }

    /// Initialize the database schema.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(CREATE_ROWS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Translate a unique index violation into a duplicate error.
    fn classify(table: Table, key: &str, err: sqlx::Error) -> StoreError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate {
                table,
                key: key.to_string(),
            },
            _ => StoreError::Database(err),
        }
    }

    fn decode(body: &str) -> Result<Row> {
        Ok(serde_json::from_str(body)?)
    }

    /// Load one body inside an open connection.
    async fn fetch_body(conn: &mut SqliteConnection, table: Table, id: Uuid) -> Result<Row> {
        let query = Query::select()
            .column(Rows::Body)
            .from(Rows::Table)
            .and_where(Expr::col(Rows::TableName).eq(table.name()))
            .and_where(Expr::col(Rows::Id).eq(id.to_string()))
            .to_string(SqliteQueryBuilder);

        let row = sqlx::query(&query)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(StoreError::NotFound { table, id })?;
        let body: String = row.try_get(0)?;
        Self::decode(&body)
    }

    async fn insert_rows(
        conn: &mut SqliteConnection,
        table: Table,
        rows: Vec<Row>,
    ) -> Result<Vec<Row>> {
        let table_schema = schema(table);
        let mut inserted = Vec::with_capacity(rows.len());

        for mut row in rows {
            table_schema
                .prepare_insert(&mut row)
                .map_err(|reason| StoreError::InvalidRow { table, reason })?;

            let id = row
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let unique_key = table_schema.unique_key(&row);
            let body = serde_json::to_string(&row)?;

            let query = Query::insert()
                .into_table(Rows::Table)
                .columns([
                    Rows::TableName,
                    Rows::Id,
                    Rows::PartitionKey,
                    Rows::UniqueKey,
                    Rows::Body,
                ])
                .values_panic([
                    table.name().into(),
                    id.clone().into(),
                    table_schema.partition_key(&row).into(),
                    unique_key.clone().into(),
                    body.into(),
                ])
                .to_string(SqliteQueryBuilder);

            let key = unique_key.unwrap_or(id);
            sqlx::query(&query)
                .execute(&mut *conn)
                .await
                .map_err(|e| Self::classify(table, &key, e))?;

            inserted.push(row);
        }

        Ok(inserted)
    }

    async fn update_row(
        conn: &mut SqliteConnection,
        table: Table,
        id: Uuid,
        patch: Row,
    ) -> Result<Row> {
        let table_schema = schema(table);
        let mut row = Self::fetch_body(conn, table, id).await?;
        table_schema.apply_patch(&mut row, patch);

        let unique_key = table_schema.unique_key(&row);
        let query = Query::update()
            .table(Rows::Table)
            .values([
                (Rows::PartitionKey, table_schema.partition_key(&row).into()),
                (Rows::UniqueKey, unique_key.clone().into()),
                (Rows::Body, serde_json::to_string(&row)?.into()),
            ])
            .and_where(Expr::col(Rows::TableName).eq(table.name()))
            .and_where(Expr::col(Rows::Id).eq(id.to_string()))
            .to_string(SqliteQueryBuilder);

        let key = unique_key.unwrap_or_else(|| id.to_string());
        sqlx::query(&query)
            .execute(&mut *conn)
            .await
            .map_err(|e| Self::classify(table, &key, e))?;

        Ok(row)
    }

    /// Run `BEGIN IMMEDIATE`, commit on success, roll back on error.
    ///
    /// BEGIN IMMEDIATE takes the write lock upfront so concurrent writers
    /// queue instead of failing to upgrade a shared lock.
    async fn begin(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(conn)
    }

    async fn finish<T>(conn: &mut SqliteConnection, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(value)
            }
            Err(e) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RowBackend for SqliteBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>> {
        let mut query = Query::select();
        query
            .column(Rows::Body)
            .from(Rows::Table)
            .and_where(Expr::col(Rows::TableName).eq(table.name()))
            .order_by(Rows::Seq, Order::Asc);

        // Narrow by partition in SQL; remaining predicates run on the bodies
        if let Some(value) = schema(table)
            .partition
            .and_then(|column| filter.eq_value(column))
        {
            let key = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            query.and_where(Expr::col(Rows::PartitionKey).eq(key));
        }

        let sql = query.to_string(SqliteQueryBuilder);
        let records = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let body: String = record.try_get(0)?;
            rows.push(Self::decode(&body)?);
        }
        Ok(filter.apply(rows))
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.begin().await?;
        let result = Self::insert_rows(&mut conn, table, rows).await;
        let inserted = Self::finish(&mut conn, result).await?;

        debug!(table = %table, count = inserted.len(), "Rows inserted");
        for row in &inserted {
            self.feed
                .publish(RowChange {
                    table,
                    kind: ChangeKind::Insert,
                    row: row.clone(),
                })
                .await;
        }
        Ok(inserted)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row> {
        let mut conn = self.begin().await?;
        let result = Self::update_row(&mut conn, table, id, patch).await;
        let updated = Self::finish(&mut conn, result).await?;

        self.feed
            .publish(RowChange {
                table,
                kind: ChangeKind::Update,
                row: updated.clone(),
            })
            .await;
        Ok(updated)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<Row> {
        let mut conn = self.begin().await?;
        let result = async {
            let row = Self::fetch_body(&mut conn, table, id).await?;
            let query = Query::delete()
                .from_table(Rows::Table)
                .and_where(Expr::col(Rows::TableName).eq(table.name()))
                .and_where(Expr::col(Rows::Id).eq(id.to_string()))
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
            Ok::<_, StoreError>(row)
        }
        .await;
        let removed = Self::finish(&mut conn, result).await?;

        self.feed
            .publish(RowChange {
                table,
                kind: ChangeKind::Delete,
                row: removed.clone(),
            })
            .await;
        Ok(removed)
    }

    fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}
