use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collaborative trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripGroup {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub destination_name: Option<String>,
    pub total_budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTripGroup {
    pub name: String,
    pub description: Option<String>,
    pub destination_name: Option<String>,
    pub total_budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Uuid,
}

/// Group form input. The creator comes from the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub description: Option<String>,
    pub destination_name: Option<String>,
    pub total_budget: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

impl MemberRole {
    /// Owners and admins may invite, remove members and edit the group.
    pub fn can_manage(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

/// Membership of one user in one group. Unique per (group, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
}

/// A group as listed for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOverview {
    pub group: TripGroup,
    pub member_count: usize,
    pub role: MemberRole,
}
