use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member's vote for a destination. Unique per (group, user, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationVote {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub destination_name: String,
    pub destination_state: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVote {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub destination_name: String,
    pub destination_state: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub duration: Option<String>,
}

/// Destination details a member proposes (and votes for) in one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposedDestination {
    pub name: String,
    pub state: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub duration: Option<String>,
}
