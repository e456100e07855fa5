//! Group budget splits and payments.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::aggregates::{summarize_budget, BudgetSummary};
use crate::error::{Result, SyncError};
use crate::interfaces::RowStore;
use crate::model::{BudgetSplit, TripGroup};
use crate::profiles::ProfileJoiner;
use crate::repository::{patch, Repository};

#[derive(Clone)]
pub struct BudgetService {
    store: Arc<dyn RowStore>,
    groups: Repository<TripGroup>,
    splits: Repository<BudgetSplit>,
    joiner: ProfileJoiner,
}

impl BudgetService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            groups: Repository::new(store.clone()),
            splits: Repository::new(store.clone()),
            joiner: ProfileJoiner::new(store.clone()),
            store,
        }
    }

    /// Bring shares up to date with the current budget and membership, then
    /// summarize who has paid what.
    #[tracing::instrument(name = "budget.overview", skip_all, fields(group_id = %group_id))]
    pub async fn overview(&self, group_id: Uuid) -> Result<BudgetSummary> {
        let group = self.groups.get(group_id).await?;
        self.store.recompute_budget_splits(group_id).await?;

        let splits = self.splits.list_by_group(group_id).await?;
        let joined = self.joiner.join(splits).await?;
        Ok(summarize_budget(group.total_budget, &joined))
    }

    /// Settle up: the split is marked fully paid.
    #[tracing::instrument(name = "budget.mark_paid", skip_all, fields(split_id = %split_id))]
    pub async fn mark_paid(&self, split_id: Uuid) -> Result<BudgetSplit> {
        let split = self.splits.get(split_id).await?;
        let settled = self
            .splits
            .update(split_id, patch(json!({ "paid_amount": split.amount })))
            .await?;
        info!(amount = split.amount, "Split settled");
        Ok(settled)
    }

    /// Record the total paid so far on a split.
    #[tracing::instrument(name = "budget.record_payment", skip_all, fields(split_id = %split_id))]
    pub async fn record_payment(&self, split_id: Uuid, paid: f64) -> Result<BudgetSplit> {
        if !(paid.is_finite() && paid >= 0.0) {
            return Err(SyncError::validation(
                "paid_amount",
                "Payment cannot be negative",
            ));
        }
        self.splits
            .update(split_id, patch(json!({ "paid_amount": paid })))
            .await
    }
}
