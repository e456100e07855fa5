//! Budget split summary.

use uuid::Uuid;

use super::one_decimal;
use crate::model::BudgetSplit;
use crate::profiles::Joined;

/// One member's standing.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberShare {
    pub split_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub amount: f64,
    pub paid: f64,
    pub remaining: f64,
    /// `paid / amount * 100`. Not clamped, so overpayment shows above 100.
    pub percent_paid: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub total_budget: Option<f64>,
    pub total_paid: f64,
    /// `total_budget - total_paid`; `None` when the group has no budget.
    pub total_remaining: Option<f64>,
    /// Overall progress, one decimal. Zero without a budget.
    pub progress_percent: f64,
    pub members: Vec<MemberShare>,
}

pub fn summarize_budget(total_budget: Option<f64>, splits: &[Joined<BudgetSplit>]) -> BudgetSummary {
    let members: Vec<MemberShare> = splits
        .iter()
        .map(|joined| {
            let split = &joined.row;
            let paid = split.paid();
            MemberShare {
                split_id: split.id,
                user_id: split.user_id,
                display_name: joined.author.display_name.clone(),
                amount: split.amount,
                paid,
                remaining: split.remaining(),
                percent_paid: if split.amount > 0.0 {
                    one_decimal(paid / split.amount * 100.0)
                } else {
                    0.0
                },
            }
        })
        .collect();

    let total_paid: f64 = members.iter().map(|m| m.paid).sum();
    let total_remaining = total_budget.map(|budget| budget - total_paid);
    let progress_percent = match total_budget {
        Some(budget) if budget > 0.0 => one_decimal(total_paid / budget * 100.0),
        _ => 0.0,
    };

    BudgetSummary {
        total_budget,
        total_paid,
        total_remaining,
        progress_percent,
        members,
    }
}
