//! Table schema: partition columns, uniqueness constraints and defaults.
//!
//! Both backends store rows as JSON objects. What makes a row valid for a
//! table is described here once and applied by every backend.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::interfaces::{Row, Table};

/// Separator between the column values of a composite unique key.
const KEY_SEPARATOR: char = '\u{1f}';

/// Column default applied on insert when the column is absent.
#[derive(Debug, Clone, Copy)]
pub enum ColumnDefault {
    /// Fresh v4 uuid.
    Id,
    /// Current time.
    Now,
    Text(&'static str),
    Number(f64),
}

/// Static description of one table.
#[derive(Debug)]
pub struct TableSchema {
    pub table: Table,
    /// Column that scopes access (group or owning user).
    pub partition: Option<&'static str>,
    /// Composite uniqueness constraint.
    pub unique: &'static [&'static str],
    /// Columns that must be present and non-null on insert.
    pub required: &'static [&'static str],
    pub defaults: &'static [(&'static str, ColumnDefault)],
    /// Refreshed on every update when present.
    pub tracks_updates: bool,
}

const CREATED: (&str, ColumnDefault) = ("created_at", ColumnDefault::Now);
const ID: (&str, ColumnDefault) = ("id", ColumnDefault::Id);
const UPDATED: (&str, ColumnDefault) = ("updated_at", ColumnDefault::Now);

static PROFILES: TableSchema = TableSchema {
    table: Table::Profiles,
    partition: None,
    unique: &["email"],
    required: &["id", "email"],
    defaults: &[CREATED, UPDATED],
    tracks_updates: true,
};

static TRIP_GROUPS: TableSchema = TableSchema {
    table: Table::TripGroups,
    partition: Some("id"),
    unique: &[],
    required: &["name", "created_by"],
    defaults: &[ID, CREATED, UPDATED],
    tracks_updates: true,
};

static TRIP_GROUP_MEMBERS: TableSchema = TableSchema {
    table: Table::TripGroupMembers,
    partition: Some("group_id"),
    unique: &["group_id", "user_id"],
    required: &["group_id", "user_id"],
    defaults: &[
        ID,
        ("role", ColumnDefault::Text("member")),
        ("joined_at", ColumnDefault::Now),
    ],
    tracks_updates: false,
};

static TRIP_INVITATIONS: TableSchema = TableSchema {
    table: Table::TripInvitations,
    partition: Some("group_id"),
    unique: &[],
    required: &["group_id", "inviter_id", "invitee_email"],
    defaults: &[
        ID,
        ("status", ColumnDefault::Text("pending")),
        CREATED,
        UPDATED,
    ],
    tracks_updates: true,
};

static DESTINATION_VOTES: TableSchema = TableSchema {
    table: Table::DestinationVotes,
    partition: Some("group_id"),
    unique: &["group_id", "user_id", "destination_name"],
    required: &["group_id", "user_id", "destination_name"],
    defaults: &[ID, CREATED],
    tracks_updates: false,
};

static GROUP_MESSAGES: TableSchema = TableSchema {
    table: Table::GroupMessages,
    partition: Some("group_id"),
    unique: &[],
    required: &["group_id", "user_id", "message"],
    defaults: &[ID, CREATED],
    tracks_updates: false,
};

static ITINERARY_ITEMS: TableSchema = TableSchema {
    table: Table::ItineraryItems,
    partition: Some("group_id"),
    unique: &[],
    required: &["group_id", "user_id", "day_date", "title"],
    defaults: &[ID, CREATED, UPDATED],
    tracks_updates: true,
};

static TRANSPORT_BOOKINGS: TableSchema = TableSchema {
    table: Table::TransportBookings,
    partition: Some("group_id"),
    unique: &[],
    required: &[
        "group_id",
        "user_id",
        "transport_type",
        "from_location",
        "to_location",
        "departure_date",
    ],
    defaults: &[ID, CREATED, UPDATED],
    tracks_updates: true,
};

static BUDGET_SPLITS: TableSchema = TableSchema {
    table: Table::BudgetSplits,
    partition: Some("group_id"),
    unique: &["group_id", "user_id"],
    required: &["group_id", "user_id", "amount"],
    defaults: &[
        ID,
        ("paid_amount", ColumnDefault::Number(0.0)),
        CREATED,
        UPDATED,
    ],
    tracks_updates: true,
};

static SAVED_TRIPS: TableSchema = TableSchema {
    table: Table::SavedTrips,
    partition: Some("user_id"),
    unique: &["user_id", "destination_name"],
    required: &["user_id", "destination_name"],
    defaults: &[ID, CREATED],
    tracks_updates: false,
};

static REVIEWS: TableSchema = TableSchema {
    table: Table::Reviews,
    partition: Some("destination_name"),
    unique: &[],
    required: &["user_id", "destination_name", "rating", "review_text"],
    defaults: &[ID, CREATED, UPDATED],
    tracks_updates: true,
};

/// Schema for a table.
pub fn schema(table: Table) -> &'static TableSchema {
    match table {
        Table::Profiles => &PROFILES,
        Table::TripGroups => &TRIP_GROUPS,
        Table::TripGroupMembers => &TRIP_GROUP_MEMBERS,
        Table::TripInvitations => &TRIP_INVITATIONS,
        Table::DestinationVotes => &DESTINATION_VOTES,
        Table::GroupMessages => &GROUP_MESSAGES,
        Table::ItineraryItems => &ITINERARY_ITEMS,
        Table::TransportBookings => &TRANSPORT_BOOKINGS,
        Table::BudgetSplits => &BUDGET_SPLITS,
        Table::SavedTrips => &SAVED_TRIPS,
        Table::Reviews => &REVIEWS,
    }
}

/// Current time as fixed-width RFC 3339, so text order is time order.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn key_part(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TableSchema {
    /// Fill defaults and check required columns. Returns the reason a row
    /// is unacceptable.
    pub fn prepare_insert(&self, row: &mut Row) -> Result<(), String> {
        for (column, default) in self.defaults {
            if row.get(*column).map(Value::is_null).unwrap_or(true) {
                let value = match default {
                    ColumnDefault::Id => Value::String(Uuid::new_v4().to_string()),
                    ColumnDefault::Now => Value::String(timestamp_now()),
                    ColumnDefault::Text(text) => Value::String((*text).to_string()),
                    ColumnDefault::Number(n) => Value::from(*n),
                };
                row.insert((*column).to_string(), value);
            }
        }
        for column in self.required {
            if row.get(*column).map(Value::is_null).unwrap_or(true) {
                return Err(format!("missing required column {column}"));
            }
        }
        match row.get("id").and_then(Value::as_str) {
            Some(id) if Uuid::parse_str(id).is_ok() => Ok(()),
            _ => Err("id must be a uuid".to_string()),
        }
    }

    /// Merge a patch into a stored row. The id never changes.
    pub fn apply_patch(&self, row: &mut Row, patch: Row) {
        for (column, value) in patch {
            if column == "id" {
                continue;
            }
            row.insert(column, value);
        }
        if self.tracks_updates {
            row.insert("updated_at".to_string(), Value::String(timestamp_now()));
        }
    }

    /// Value of the partition column.
    pub fn partition_key(&self, row: &Row) -> Option<String> {
        self.partition
            .and_then(|column| row.get(column))
            .filter(|v| !v.is_null())
            .map(key_part)
    }

    /// Composite unique key, `None` when the table has no constraint or a
    /// constrained column is null (nulls never collide).
    pub fn unique_key(&self, row: &Row) -> Option<String> {
        if self.unique.is_empty() {
            return None;
        }
        let mut parts = Vec::with_capacity(self.unique.len());
        for column in self.unique {
            match row.get(*column) {
                Some(v) if !v.is_null() => parts.push(key_part(v)),
                _ => return None,
            }
        }
        Some(parts.join(&KEY_SEPARATOR.to_string()))
    }
}

#[cfg(feature = "sqlite")]
pub use self::sql::*;

#[cfg(feature = "sqlite")]
mod sql {
    use sea_query::Iden;

    /// Rows table schema. One physical table holds every logical table.
    #[derive(Iden)]
    pub enum Rows {
        Table,
        #[iden = "seq"]
        Seq,
        #[iden = "table_name"]
        TableName,
        #[iden = "id"]
        Id,
        #[iden = "partition_key"]
        PartitionKey,
        #[iden = "unique_key"]
        UniqueKey,
        #[iden = "body"]
        Body,
    }

    /// SQL for creating the rows table.
    pub const CREATE_ROWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS rows (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    id TEXT NOT NULL,
    partition_key TEXT,
    unique_key TEXT,
    body TEXT NOT NULL,
    UNIQUE (table_name, id),
    UNIQUE (table_name, unique_key)
);

CREATE INDEX IF NOT EXISTS idx_rows_partition ON rows(table_name, partition_key);
"#;
}
