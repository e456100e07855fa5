//! Row-level access policy.
//!
//! [`SessionStore`] wraps a backend and checks every call against the
//! caller's memberships before it reaches the tables. Reads pinned to a
//! group the caller does not belong to are rejected; unpinned reads are
//! narrowed to rows the caller may see.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::procedures;
use super::schema::schema;
use crate::feed::Subscription;
use crate::interfaces::{
    uuid_column, Filter, Result, Row, RowBackend, RowStore, StoreError, Table,
};
use crate::model::{InvitationStatus, MemberRole, Session};

/// Tables whose rows belong to one group.
fn group_scoped(table: Table) -> bool {
    matches!(
        table,
        Table::TripGroups
            | Table::TripGroupMembers
            | Table::TripInvitations
            | Table::DestinationVotes
            | Table::GroupMessages
            | Table::ItineraryItems
            | Table::TransportBookings
            | Table::BudgetSplits
    )
}

fn denied(reason: impl Into<String>) -> StoreError {
    StoreError::NotAuthorized(reason.into())
}

fn parse_role(row: &Row) -> MemberRole {
    match row.get("role").and_then(Value::as_str) {
        Some("owner") => MemberRole::Owner,
        Some("admin") => MemberRole::Admin,
        _ => MemberRole::Member,
    }
}

/// Group id a row belongs to.
fn group_of(table: Table, row: &Row) -> Option<Uuid> {
    schema(table)
        .partition
        .and_then(|column| uuid_column(row, column))
}

/// Session-scoped store enforcing the access policy.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn RowBackend>,
    session: Session,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn RowBackend>, session: Session) -> Self {
        Self { backend, session }
    }

    fn me(&self) -> Uuid {
        self.session.user_id
    }

    fn is_me(&self, row: &Row, column: &str) -> bool {
        uuid_column(row, column) == Some(self.me())
    }

    /// Caller's role in a group, if a member.
    async fn role_in(&self, group_id: Uuid) -> Result<Option<MemberRole>> {
        let rows = self
            .backend
            .select(
                Table::TripGroupMembers,
                &Filter::group(group_id).eq("user_id", self.me().to_string()),
            )
            .await?;
        Ok(rows.first().map(parse_role))
    }

    async fn require_member(&self, group_id: Uuid) -> Result<MemberRole> {
        self.role_in(group_id).await?.ok_or_else(|| {
            warn!(group_id = %group_id, user_id = %self.me(), "Caller is not a group member");
            denied(format!("not a member of group {group_id}"))
        })
    }

    async fn require_manager(&self, group_id: Uuid) -> Result<MemberRole> {
        let role = self.require_member(group_id).await?;
        if !role.can_manage() {
            return Err(denied("requires owner or admin role"));
        }
        Ok(role)
    }

    /// Group ids the caller belongs to.
    async fn my_groups(&self) -> Result<HashSet<Uuid>> {
        let rows = self
            .backend
            .select(
                Table::TripGroupMembers,
                &Filter::new().eq("user_id", self.me().to_string()),
            )
            .await?;
        Ok(rows
            .iter()
            .filter_map(|r| uuid_column(r, "group_id"))
            .collect())
    }

    fn is_invitee(&self, invitation: &Row) -> bool {
        if self.is_me(invitation, "invitee_id") {
            return true;
        }
        invitation
            .get("invitee_email")
            .and_then(Value::as_str)
            .map(|email| self.session.email_matches(email))
            .unwrap_or(false)
    }

    /// Whether the caller holds an accepted invitation to a group.
    async fn accepted_invitation(&self, group_id: Uuid) -> Result<bool> {
        let invitations = self
            .backend
            .select(
                Table::TripInvitations,
                &Filter::group(group_id).eq("status", InvitationStatus::Accepted.as_str()),
            )
            .await?;
        Ok(invitations.iter().any(|inv| self.is_invitee(inv)))
    }

    async fn fetch(&self, table: Table, id: Uuid) -> Result<Row> {
        self.backend
            .select(table, &Filter::new().eq("id", id.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { table, id })
    }

    fn require_group(&self, table: Table, row: &Row) -> Result<Uuid> {
        group_of(table, row).ok_or_else(|| StoreError::InvalidRow {
            table,
            reason: "missing group reference".to_string(),
        })
    }

    /// Membership insert rules: managers add anyone (only owners add
    /// owners); a user may add themselves as owner of a group they created,
    /// or as member after accepting an invitation.
    async fn check_member_insert(&self, row: &Row) -> Result<()> {
        let group_id = self.require_group(Table::TripGroupMembers, row)?;
        let new_role = parse_role(row);

        if let Some(role) = self.role_in(group_id).await? {
            if role.can_manage() {
                if new_role == MemberRole::Owner && role != MemberRole::Owner {
                    return Err(denied("only an owner can add another owner"));
                }
                return Ok(());
            }
        }

        if !self.is_me(row, "user_id") {
            return Err(denied("cannot add other users to this group"));
        }

        match new_role {
            MemberRole::Owner => {
                let group = self.fetch(Table::TripGroups, group_id).await?;
                if self.is_me(&group, "created_by") {
                    Ok(())
                } else {
                    Err(denied("only the creator can join as owner"))
                }
            }
            MemberRole::Admin => Err(denied("cannot self-assign admin")),
            MemberRole::Member => {
                if self.accepted_invitation(group_id).await? {
                    Ok(())
                } else {
                    Err(denied("no accepted invitation for this group"))
                }
            }
        }
    }

    async fn check_insert(&self, table: Table, row: &Row) -> Result<()> {
        match table {
            Table::Profiles => {
                if !self.is_me(row, "id") {
                    return Err(denied("profiles can only be created for yourself"));
                }
            }
            Table::TripGroups => {
                if !self.is_me(row, "created_by") {
                    return Err(denied("groups must be created by the caller"));
                }
            }
            Table::TripGroupMembers => self.check_member_insert(row).await?,
            Table::TripInvitations => {
                let group_id = self.require_group(table, row)?;
                self.require_manager(group_id).await?;
                if !self.is_me(row, "inviter_id") {
                    return Err(denied("inviter must be the caller"));
                }
            }
            Table::BudgetSplits => {
                let group_id = self.require_group(table, row)?;
                self.require_manager(group_id).await?;
            }
            Table::DestinationVotes
            | Table::GroupMessages
            | Table::ItineraryItems
            | Table::TransportBookings => {
                let group_id = self.require_group(table, row)?;
                self.require_member(group_id).await?;
                if !self.is_me(row, "user_id") {
                    return Err(denied("rows must be authored by the caller"));
                }
            }
            Table::SavedTrips | Table::Reviews => {
                if !self.is_me(row, "user_id") {
                    return Err(denied("rows must be owned by the caller"));
                }
            }
        }
        Ok(())
    }

    /// Update/delete rules on an existing row.
    async fn check_write(&self, table: Table, row: &Row, deleting: bool) -> Result<()> {
        match table {
            Table::Profiles => {
                if deleting || !self.is_me(row, "id") {
                    return Err(denied("profiles can only be edited by their owner"));
                }
            }
            Table::TripGroups => {
                // Creators may remove a group even before their owner row exists
                if deleting && self.is_me(row, "created_by") {
                    return Ok(());
                }
                let group_id = self.require_group(table, row)?;
                let role = self.require_manager(group_id).await?;
                if deleting && role != MemberRole::Owner {
                    return Err(denied("only the owner can delete a group"));
                }
            }
            Table::TripGroupMembers => {
                let group_id = self.require_group(table, row)?;
                let leaving = deleting && self.is_me(row, "user_id");
                if !leaving {
                    self.require_manager(group_id).await?;
                }
            }
            Table::TripInvitations => {
                let group_id = self.require_group(table, row)?;
                let manager = matches!(self.role_in(group_id).await?, Some(r) if r.can_manage());
                if !manager && (deleting || !self.is_invitee(row)) {
                    return Err(denied("only managers or the invitee may change an invitation"));
                }
            }
            Table::GroupMessages => {
                return Err(denied("messages are append-only"));
            }
            Table::DestinationVotes
            | Table::ItineraryItems
            | Table::TransportBookings
            | Table::BudgetSplits => {
                let group_id = self.require_group(table, row)?;
                let role = self.require_member(group_id).await?;
                if !role.can_manage() && !self.is_me(row, "user_id") {
                    return Err(denied("rows can only be changed by their author"));
                }
            }
            Table::SavedTrips | Table::Reviews => {
                if !self.is_me(row, "user_id") {
                    return Err(denied("rows can only be changed by their owner"));
                }
            }
        }
        Ok(())
    }

    /// Invitees may only set the status and claim the invitation.
    fn check_invitee_patch(&self, row: &Row, patch: &Row, manager: bool) -> Result<()> {
        if manager || !self.is_invitee(row) {
            return Ok(());
        }
        for (column, value) in patch {
            match column.as_str() {
                "status" => {}
                "invitee_id" if value.as_str() == Some(self.me().to_string().as_str()) => {}
                other => {
                    return Err(denied(format!("invitee cannot change {other}")));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for SessionStore {
    fn session(&self) -> &Session {
        &self.session
    }

    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>> {
        match table {
            Table::Profiles | Table::Reviews => self.backend.select(table, &filter).await,
            Table::SavedTrips => {
                let filter = filter.eq("user_id", self.me().to_string());
                self.backend.select(table, &filter).await
            }
            _ => {
                let partition = schema(table).partition.unwrap_or("group_id");
                let pinned = filter
                    .eq_value(partition)
                    .and_then(Value::as_str)
                    .and_then(|s| Uuid::parse_str(s).ok());

                if let Some(group_id) = pinned {
                    if self.role_in(group_id).await?.is_some() {
                        return self.backend.select(table, &filter).await;
                    }
                    if table == Table::TripInvitations {
                        let rows = self.backend.select(table, &filter).await?;
                        return Ok(rows.into_iter().filter(|r| self.is_invitee(r)).collect());
                    }
                    warn!(table = %table, group_id = %group_id, "Read of foreign group rejected");
                    return Err(denied(format!("not a member of group {group_id}")));
                }

                let groups = self.my_groups().await?;
                let rows = self.backend.select(table, &filter).await?;
                Ok(rows
                    .into_iter()
                    .filter(|r| {
                        group_of(table, r).map(|g| groups.contains(&g)).unwrap_or(false)
                            || (table == Table::TripInvitations && self.is_invitee(r))
                    })
                    .collect())
            }
        }
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<Vec<Row>> {
        for row in &rows {
            self.check_insert(table, row).await?;
        }
        debug!(table = %table, count = rows.len(), user_id = %self.me(), "Insert authorized");
        self.backend.insert(table, rows).await
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row> {
        let existing = self.fetch(table, id).await?;
        self.check_write(table, &existing, false).await?;

        if let Some(column) = schema(table).partition {
            let moved = patch.contains_key(column) && patch.get(column) != existing.get(column);
            if group_scoped(table) && moved {
                return Err(denied("rows cannot move between groups"));
            }
        }
        if table == Table::TripInvitations {
            let group_id = self.require_group(table, &existing)?;
            let manager = matches!(self.role_in(group_id).await?, Some(r) if r.can_manage());
            self.check_invitee_patch(&existing, &patch, manager)?;
        }

        self.backend.update(table, id, patch).await
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        let existing = self.fetch(table, id).await?;
        self.check_write(table, &existing, true).await?;
        self.backend.delete(table, id).await?;
        Ok(())
    }

    async fn subscribe(&self, table: Table, filter: Filter) -> Result<Subscription> {
        if !group_scoped(table) {
            return Err(denied(format!("{table} has no realtime channel")));
        }
        let partition = schema(table).partition.unwrap_or("group_id");
        let group_id = filter
            .eq_value(partition)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| denied("subscriptions must be scoped to one group"))?;
        self.require_member(group_id).await?;

        Ok(self.backend.feed().subscribe(table, filter).await)
    }

    async fn recompute_budget_splits(&self, group_id: Uuid) -> Result<()> {
        self.require_member(group_id).await?;
        procedures::recompute_budget_splits(self.backend.as_ref(), group_id).await
    }
}
