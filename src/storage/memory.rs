//! In-memory row backend.
//!
//! Tables are vectors in insertion order behind a tokio `RwLock`. Used for
//! local development, tests and as the reference behavior the SQLite
//! backend is checked against.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::schema::schema;
use crate::feed::{ChangeFeed, ChangeKind, RowChange};
use crate::interfaces::{uuid_column, Filter, Result, Row, RowBackend, StoreError, Table};

/// Row backend holding every table in process memory.
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    feed: ChangeFeed,
    offline: RwLock<bool>,
    fail_on_insert: RwLock<HashSet<Table>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed_capacity(capacity: usize) -> Self {
        Self {
            feed: ChangeFeed::new(capacity),
            ..Self::default()
        }
    }

    /// Simulate losing connectivity: every call fails as unavailable.
    pub async fn set_offline(&self, offline: bool) {
        *self.offline.write().await = offline;
    }

    /// Make inserts into one table fail as unavailable.
    pub async fn set_fail_on_insert(&self, table: Table, fail: bool) {
        let mut failing = self.fail_on_insert.write().await;
        if fail {
            failing.insert(table);
        } else {
            failing.remove(&table);
        }
    }

    async fn check_online(&self) -> Result<()> {
        if *self.offline.read().await {
            return Err(StoreError::Unavailable("memory backend offline".to_string()));
        }
        Ok(())
    }
}

fn row_id(row: &Row) -> Option<Uuid> {
    uuid_column(row, "id")
}

#[async_trait]
impl RowBackend for MemoryBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Row>> {
        self.check_online().await?;
        let tables = self.tables.read().await;
        let rows = tables.get(&table).cloned().unwrap_or_default();
        Ok(filter.apply(rows))
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        self.check_online().await?;
        if self.fail_on_insert.read().await.contains(&table) {
            return Err(StoreError::Unavailable(format!(
                "insert into {table} failed"
            )));
        }

        let table_schema = schema(table);
        let mut prepared = Vec::with_capacity(rows.len());
        {
            let mut tables = self.tables.write().await;
            let existing = tables.entry(table).or_default();

            let mut ids: HashSet<Uuid> = existing.iter().filter_map(row_id).collect();
            let mut keys: HashSet<String> = existing
                .iter()
                .filter_map(|r| table_schema.unique_key(r))
                .collect();

            for mut row in rows {
                table_schema
                    .prepare_insert(&mut row)
                    .map_err(|reason| StoreError::InvalidRow { table, reason })?;

                if let Some(id) = row_id(&row) {
                    if !ids.insert(id) {
                        return Err(StoreError::Duplicate {
                            table,
                            key: id.to_string(),
                        });
                    }
                }
                if let Some(key) = table_schema.unique_key(&row) {
                    if !keys.insert(key.clone()) {
                        return Err(StoreError::Duplicate { table, key });
                    }
                }
                prepared.push(row);
            }

            existing.extend(prepared.iter().cloned());
        }

        debug!(table = %table, count = prepared.len(), "Rows inserted");
        for row in &prepared {
            self.feed
                .publish(RowChange {
                    table,
                    kind: ChangeKind::Insert,
                    row: row.clone(),
                })
                .await;
        }
        Ok(prepared)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row> {
        self.check_online().await?;
        let table_schema = schema(table);

        let updated = {
            let mut tables = self.tables.write().await;
            let rows = tables.entry(table).or_default();
            let index = rows
                .iter()
                .position(|r| row_id(r) == Some(id))
                .ok_or(StoreError::NotFound { table, id })?;

            let mut candidate = rows[index].clone();
            table_schema.apply_patch(&mut candidate, patch);

            if let Some(key) = table_schema.unique_key(&candidate) {
                let collides = rows.iter().enumerate().any(|(i, r)| {
                    i != index && table_schema.unique_key(r).as_deref() == Some(key.as_str())
                });
                if collides {
                    return Err(StoreError::Duplicate { table, key });
                }
            }

            rows[index] = candidate.clone();
            candidate
        };

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
        self.check_online().await?;

        let removed = {
            let mut tables = self.tables.write().await;
            let rows = tables.entry(table).or_default();
            let index = rows
                .iter()
                .position(|r| row_id(r) == Some(id))
                .ok_or(StoreError::NotFound { table, id })?;
            rows.remove(index)
        };

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
