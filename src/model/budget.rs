use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What one member owes toward the group budget, and has paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetSplit {
    pub fn paid(&self) -> f64 {
        self.paid_amount.unwrap_or(0.0)
    }

    pub fn remaining(&self) -> f64 {
        self.amount - self.paid()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudgetSplit {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub paid_amount: Option<f64>,
}
