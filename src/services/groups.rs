//! Trip groups.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{caller, optional_text, required_text};
use crate::error::{Result, SyncError};
use crate::interfaces::{Filter, RowStore};
use crate::model::{
    CreateGroup, GroupMember, GroupOverview, MemberRole, NewMember, NewTripGroup, TripGroup,
};
use crate::repository::{patch, Repository};

#[derive(Clone)]
pub struct GroupService {
    me: Uuid,
    groups: Repository<TripGroup>,
    members: Repository<GroupMember>,
}

fn check_budget(budget: Option<f64>) -> Result<()> {
    match budget {
        Some(total) if !(total.is_finite() && total > 0.0) => Err(SyncError::validation(
            "total_budget",
            "Budget must be greater than zero",
        )),
        _ => Ok(()),
    }
}

impl GroupService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            groups: Repository::new(store.clone()),
            members: Repository::new(store),
        }
    }

    /// Create a group owned by the caller.
    ///
    /// The group row and the owner membership are two writes. When the
    /// membership cannot be written the group row is removed again, so no
    /// group is left without an owner.
    #[tracing::instrument(name = "groups.create", skip_all, fields(user_id = %self.me))]
    pub async fn create(&self, input: CreateGroup) -> Result<TripGroup> {
        let name = required_text("name", &input.name, "Please enter a group name")?;
        check_budget(input.total_budget)?;

        let group = self
            .groups
            .insert(&NewTripGroup {
                name,
                description: optional_text(input.description.as_deref()),
                destination_name: optional_text(input.destination_name.as_deref()),
                total_budget: input.total_budget,
                start_date: input.start_date,
                end_date: input.end_date,
                created_by: self.me,
            })
            .await?;

        let owner = NewMember {
            group_id: group.id,
            user_id: self.me,
            role: MemberRole::Owner,
        };
        if let Err(err) = self.members.insert(&owner).await {
            warn!(group_id = %group.id, error = %err, "Owner membership failed, removing group");
            if let Err(undo) = self.groups.delete(group.id).await {
                error!(group_id = %group.id, error = %undo, "Failed to remove ownerless group");
            }
            return Err(err);
        }

        info!(group_id = %group.id, "Group created");
        Ok(group)
    }

    /// Groups the caller belongs to, newest first, with member counts.
    #[tracing::instrument(name = "groups.list_mine", skip_all, fields(user_id = %self.me))]
    pub async fn list_mine(&self) -> Result<Vec<GroupOverview>> {
        let memberships = self.my_memberships().await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let roles: HashMap<Uuid, MemberRole> = memberships
            .iter()
            .map(|m| (m.group_id, m.role))
            .collect();
        let ids: Vec<String> = roles.keys().map(Uuid::to_string).collect();

        let groups = self
            .groups
            .list(Filter::new().is_in("id", ids.clone()))
            .await?;
        let everyone = self
            .members
            .list(Filter::new().is_in("group_id", ids))
            .await?;

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for member in &everyone {
            *counts.entry(member.group_id).or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|group| GroupOverview {
                member_count: counts.get(&group.id).copied().unwrap_or(0),
                role: roles.get(&group.id).copied().unwrap_or_default(),
                group,
            })
            .collect())
    }

    pub async fn get(&self, group_id: Uuid) -> Result<TripGroup> {
        self.groups.get(group_id).await
    }

    /// Caller's role in a group, `None` when not a member.
    pub async fn role_of(&self, group_id: Uuid) -> Result<Option<MemberRole>> {
        Ok(self
            .my_memberships()
            .await?
            .into_iter()
            .find(|m| m.group_id == group_id)
            .map(|m| m.role))
    }

    /// Change the group budget. Shares follow on the next budget overview.
    #[tracing::instrument(name = "groups.set_budget", skip_all, fields(group_id = %group_id))]
    pub async fn set_budget(&self, group_id: Uuid, total_budget: Option<f64>) -> Result<TripGroup> {
        check_budget(total_budget)?;
        self.groups
            .update(group_id, patch(json!({ "total_budget": total_budget })))
            .await
    }

    async fn my_memberships(&self) -> Result<Vec<GroupMember>> {
        self.members
            .list(Filter::new().eq("user_id", self.me.to_string()))
            .await
    }
}
