//! Generic repository over one resource table.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::Resource;
use crate::error::{Result, SyncError};
use crate::feed::Subscription;
use crate::interfaces::{Filter, Row, RowStore, StoreError};

/// Build an update patch from a JSON object literal.
///
/// Anything other than an object yields an empty patch.
pub fn patch(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value).map_err(StoreError::from)? {
        Value::Object(map) => Ok(map),
        other => Err(SyncError::validation(
            "row",
            format!("expected an object, got {other}"),
        )),
    }
}

/// Typed access to one table through a session-scoped store.
pub struct Repository<R> {
    store: Arc<dyn RowStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    /// Decode a raw row, e.g. one delivered by a subscription.
    pub fn decode(&self, row: Row) -> Result<R> {
        serde_json::from_value(Value::Object(row))
            .map_err(|e| SyncError::from(StoreError::from(e)))
    }

    fn decode_all(&self, rows: Vec<Row>) -> Result<Vec<R>> {
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    /// Every row of a group in the resource's default order.
    #[tracing::instrument(name = "repository.list_by_group", skip_all, fields(table = %R::TABLE, group_id = %group_id))]
    pub async fn list_by_group(&self, group_id: Uuid) -> Result<Vec<R>> {
        self.list(R::scope(group_id)).await
    }

    /// Rows matching `filter`. Without an explicit ordering the resource's
    /// default order applies.
    pub async fn list(&self, filter: Filter) -> Result<Vec<R>> {
        let filter = if filter.order.is_empty() {
            R::default_order(filter)
        } else {
            filter
        };
        let rows = self.store.select(R::TABLE, filter).await?;
        debug!(table = %R::TABLE, count = rows.len(), "Rows listed");
        self.decode_all(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<R> {
        self.find(id)
            .await?
            .ok_or_else(|| SyncError::not_found(R::KIND, id))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<R>> {
        let rows = self
            .store
            .select(R::TABLE, Filter::new().eq("id", id.to_string()))
            .await?;
        rows.into_iter().next().map(|row| self.decode(row)).transpose()
    }

    #[tracing::instrument(name = "repository.insert", skip_all, fields(table = %R::TABLE))]
    pub async fn insert(&self, draft: &R::Draft) -> Result<R> {
        let inserted = self.store.insert(R::TABLE, vec![encode(draft)?]).await?;
        inserted
            .into_iter()
            .next()
            .map(|row| self.decode(row))
            .ok_or_else(|| SyncError::TransientStore("insert returned no row".to_string()))?
    }

    /// Insert a batch; all rows commit or none do.
    #[tracing::instrument(name = "repository.insert_many", skip_all, fields(table = %R::TABLE, count = drafts.len()))]
    pub async fn insert_many(&self, drafts: &[R::Draft]) -> Result<Vec<R>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let rows = drafts.iter().map(encode).collect::<Result<Vec<_>>>()?;
        let inserted = self.store.insert(R::TABLE, rows).await?;
        self.decode_all(inserted)
    }

    #[tracing::instrument(name = "repository.update", skip_all, fields(table = %R::TABLE, id = %id))]
    pub async fn update(&self, id: Uuid, patch: Row) -> Result<R> {
        let row = self.store.update(R::TABLE, id, patch).await?;
        self.decode(row)
    }

    #[tracing::instrument(name = "repository.delete", skip_all, fields(table = %R::TABLE, id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(R::TABLE, id).await?;
        Ok(())
    }

    /// Live inserts for one group.
    pub async fn subscribe(&self, group_id: Uuid) -> Result<Subscription> {
        Ok(self.store.subscribe(R::TABLE, R::scope(group_id)).await?)
    }
}
