//! Store-side procedures. These run with backend privileges, after the
//! caller has been authorized by the policy layer.

use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::interfaces::{uuid_column, Filter, Result, Row, RowBackend, StoreError, Table};

/// Recompute equal budget shares for every member of a group.
///
/// Each member owes `total_budget / member_count`. Missing split rows are
/// created, existing rows get the new amount with `paid_amount` untouched,
/// and rows of users who left the group are removed. A group without a
/// positive budget is left as is.
///
/// Concurrent runs for the same group converge: a split another run has
/// already created or removed counts as done.
#[tracing::instrument(name = "procedure.budget_splits", skip(backend))]
pub async fn recompute_budget_splits(backend: &dyn RowBackend, group_id: Uuid) -> Result<()> {
    let group_key = group_id.to_string();
    let group = backend
        .select(Table::TripGroups, &Filter::new().eq("id", group_key.clone()))
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound {
            table: Table::TripGroups,
            id: group_id,
        })?;

    let total_budget = match group.get("total_budget").and_then(Value::as_f64) {
        Some(total) if total > 0.0 => total,
        _ => {
            debug!("Group has no budget, splits left untouched");
            return Ok(());
        }
    };

    let members: Vec<Uuid> = backend
        .select(
            Table::TripGroupMembers,
            &Filter::group(group_id).order_by("joined_at", true),
        )
        .await?
        .iter()
        .filter_map(|m| uuid_column(m, "user_id"))
        .collect();
    if members.is_empty() {
        return Ok(());
    }

    let share = total_budget / members.len() as f64;
    let member_set: HashSet<Uuid> = members.iter().copied().collect();
    let splits = backend
        .select(Table::BudgetSplits, &Filter::group(group_id))
        .await?;

    let mut covered = HashSet::new();
    for split in &splits {
        let (Some(split_id), Some(user_id)) = (uuid_column(split, "id"), uuid_column(split, "user_id"))
        else {
            continue;
        };

        if !member_set.contains(&user_id) {
            settled(backend.delete(Table::BudgetSplits, split_id).await)?;
            continue;
        }

        covered.insert(user_id);
        if split.get("amount").and_then(Value::as_f64) != Some(share) {
            let mut patch = Row::new();
            patch.insert("amount".to_string(), json!(share));
            settled(backend.update(Table::BudgetSplits, split_id, patch).await)?;
        }
    }

    // One insert per member, so a split created by a concurrent run only
    // skips that member.
    for user_id in members.iter().filter(|user_id| !covered.contains(*user_id)) {
        let Some(split) = json!({
            "group_id": group_key,
            "user_id": user_id.to_string(),
            "amount": share,
            "paid_amount": 0.0,
        })
        .as_object()
        .cloned() else {
            continue;
        };

        match backend.insert(Table::BudgetSplits, vec![split]).await {
            Ok(_) => {}
            Err(StoreError::Duplicate { .. }) => {
                debug!(%user_id, "Split created concurrently, rebalancing it");
                rebalance(backend, group_id, *user_id, share).await?;
            }
            Err(e) => return Err(e),
        }
    }

    info!(members = members.len(), share, "Budget splits recomputed");
    Ok(())
}

/// A split removed by a concurrent run is already in the state we want.
fn settled(result: Result<Row>) -> Result<()> {
    match result {
        Ok(_) | Err(StoreError::NotFound { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Bring a concurrently created split to the current share.
async fn rebalance(backend: &dyn RowBackend, group_id: Uuid, user_id: Uuid, share: f64) -> Result<()> {
    let existing = backend
        .select(
            Table::BudgetSplits,
            &Filter::group(group_id).eq("user_id", user_id.to_string()),
        )
        .await?;

    for split in existing {
        let Some(split_id) = uuid_column(&split, "id") else {
            continue;
        };
        if split.get("amount").and_then(Value::as_f64) != Some(share) {
            let mut patch = Row::new();
            patch.insert("amount".to_string(), json!(share));
            settled(backend.update(Table::BudgetSplits, split_id, patch).await)?;
        }
    }
    Ok(())
}
