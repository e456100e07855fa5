//! Group membership.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::caller;
use crate::error::{ResourceKind, Result, SyncError};
use crate::interfaces::{Filter, RowStore};
use crate::model::{GroupMember, MemberRole};
use crate::profiles::{Joined, ProfileJoiner};
use crate::repository::Repository;

#[derive(Clone)]
pub struct MemberService {
    me: Uuid,
    members: Repository<GroupMember>,
    joiner: ProfileJoiner,
}

impl MemberService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            members: Repository::new(store.clone()),
            joiner: ProfileJoiner::new(store),
        }
    }

    /// Members in join order, with their profiles.
    pub async fn list(&self, group_id: Uuid) -> Result<Vec<Joined<GroupMember>>> {
        let members = self.members.list_by_group(group_id).await?;
        self.joiner.join(members).await
    }

    /// Remove someone else's membership. Owner or admin only.
    #[tracing::instrument(name = "members.remove", skip_all, fields(group_id = %group_id, member_id = %member_id))]
    pub async fn remove(&self, group_id: Uuid, member_id: Uuid) -> Result<()> {
        let member = self.members.get(member_id).await?;
        if member.group_id != group_id {
            return Err(SyncError::not_found(ResourceKind::Member, member_id));
        }
        if member.role == MemberRole::Owner {
            return Err(SyncError::validation(
                "member",
                "The group owner cannot be removed",
            ));
        }
        self.members.delete(member_id).await?;
        info!(user_id = %member.user_id, "Member removed");
        Ok(())
    }

    /// Leave a group. Owners cannot leave their own group.
    #[tracing::instrument(name = "members.leave", skip_all, fields(group_id = %group_id, user_id = %self.me))]
    pub async fn leave(&self, group_id: Uuid) -> Result<()> {
        let mine = self
            .members
            .list(Filter::group(group_id).eq("user_id", self.me.to_string()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::not_found(ResourceKind::Member, self.me))?;
        if mine.role == MemberRole::Owner {
            return Err(SyncError::validation(
                "member",
                "The group owner cannot leave the group",
            ));
        }
        self.members.delete(mine.id).await?;
        info!("Left group");
        Ok(())
    }
}
