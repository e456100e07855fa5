//! Tables, rows and filters shared by every row store.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ResourceKind;

/// A row is a JSON object keyed by column name.
pub type Row = Map<String, Value>;

/// The table set of the collaborative trip store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Profiles,
    TripGroups,
    TripGroupMembers,
    TripInvitations,
    DestinationVotes,
    GroupMessages,
    ItineraryItems,
    TransportBookings,
    BudgetSplits,
    SavedTrips,
    Reviews,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::Profiles,
        Table::TripGroups,
        Table::TripGroupMembers,
        Table::TripInvitations,
        Table::DestinationVotes,
        Table::GroupMessages,
        Table::ItineraryItems,
        Table::TransportBookings,
        Table::BudgetSplits,
        Table::SavedTrips,
        Table::Reviews,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::TripGroups => "trip_groups",
            Table::TripGroupMembers => "trip_group_members",
            Table::TripInvitations => "trip_invitations",
            Table::DestinationVotes => "destination_votes",
            Table::GroupMessages => "group_messages",
            Table::ItineraryItems => "itinerary_items",
            Table::TransportBookings => "transport_bookings",
            Table::BudgetSplits => "budget_splits",
            Table::SavedTrips => "saved_trips",
            Table::Reviews => "reviews",
        }
    }

    /// Resource family the table stores, used when classifying errors.
    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            Table::Profiles => ResourceKind::Profile,
            Table::TripGroups => ResourceKind::Group,
            Table::TripGroupMembers => ResourceKind::Member,
            Table::TripInvitations => ResourceKind::Invitation,
            Table::DestinationVotes => ResourceKind::Vote,
            Table::GroupMessages => ResourceKind::Message,
            Table::ItineraryItems => ResourceKind::ItineraryItem,
            Table::TransportBookings => ResourceKind::TransportBooking,
            Table::BudgetSplits => ResourceKind::BudgetSplit,
            Table::SavedTrips => ResourceKind::SavedTrip,
            Table::Reviews => ResourceKind::Review,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown table: {s}"))
    }
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Condition {
    pub fn column(&self) -> &str {
        match self {
            Condition::Eq(column, _) | Condition::In(column, _) => column,
        }
    }

    fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::Eq(column, expected) => row.get(column) == Some(expected),
            Condition::In(column, values) => row
                .get(column)
                .map(|v| values.contains(v))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Conjunction of equality/membership predicates plus an ordering.
///
/// Ordering is stable, so rows that compare equal keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
    pub order: Vec<OrderBy>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `eq("group_id", group_id)`.
    pub fn group(group_id: Uuid) -> Self {
        Self::new().eq("group_id", group_id.to_string())
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(column.into(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In(
            column.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Value pinned by an equality predicate on `column`, if any.
    pub fn eq_value(&self, column: &str) -> Option<&Value> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Eq(col, v) if col == column => Some(v),
            _ => None,
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }

    /// Filter and sort rows held in insertion order.
    pub fn apply(&self, rows: impl IntoIterator<Item = Row>) -> Vec<Row> {
        let mut matched: Vec<Row> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if !self.order.is_empty() {
            matched.sort_by(|a, b| self.compare(a, b));
        }
        matched
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for order in &self.order {
            let ord = compare_values(a.get(&order.column), b.get(&order.column));
            let ord = if order.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Column comparison: missing/null first, numbers numerically, strings
/// lexicographically. Timestamps are stored as fixed-width RFC 3339 text so
/// lexical order is chronological.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Read a uuid column.
pub fn uuid_column(row: &Row, column: &str) -> Option<Uuid> {
    row.get(column)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}
