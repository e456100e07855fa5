//! Group invitations.
//!
//! Accepting an invitation takes two writes: the invitation is marked
//! accepted (which is what authorizes the invitee to add themselves) and
//! then the membership row is inserted. When the second write fails the
//! first is compensated by putting the invitation back to pending, so the
//! invitee can try again. A duplicate membership means the invitee already
//! belongs to the group; the acceptance stands and the existing membership
//! is returned.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ResourceKind, Result, SyncError};
use crate::interfaces::{Filter, RowStore};
use crate::model::{
    GroupMember, Invitation, InvitationStatus, MemberRole, NewInvitation, NewMember, Session,
};
use crate::profiles::{Joined, ProfileJoiner};
use crate::repository::{patch, Repository};

/// Loose shape check: one `@`, a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Clone)]
pub struct InvitationService {
    session: Session,
    invitations: Repository<Invitation>,
    members: Repository<GroupMember>,
    joiner: ProfileJoiner,
}

impl InvitationService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            session: store.session().clone(),
            invitations: Repository::new(store.clone()),
            members: Repository::new(store.clone()),
            joiner: ProfileJoiner::new(store),
        }
    }

    fn me(&self) -> Uuid {
        self.session.user_id
    }

    fn addressed_to_me(&self, invitation: &Invitation) -> bool {
        invitation.invitee_id == Some(self.me())
            || self.session.email_matches(&invitation.invitee_email)
    }

    async fn membership(&self, group_id: Uuid, user_id: Uuid) -> Result<Option<GroupMember>> {
        Ok(self
            .members
            .list(Filter::group(group_id).eq("user_id", user_id.to_string()))
            .await?
            .into_iter()
            .next())
    }

    /// Invite someone by email. Owner or admin only.
    #[tracing::instrument(name = "invitations.send", skip_all, fields(group_id = %group_id))]
    pub async fn send(&self, group_id: Uuid, email: &str) -> Result<Invitation> {
        if !is_valid_email(email) {
            return Err(SyncError::validation(
                "invitee_email",
                "Please enter a valid email address",
            ));
        }
        let email = email.trim().to_lowercase();

        let role = self
            .membership(group_id, self.me())
            .await?
            .map(|m| m.role)
            .unwrap_or_default();
        if !role.can_manage() {
            return Err(SyncError::NotAuthorized(
                "only owners and admins can invite".to_string(),
            ));
        }

        let invitee = self.joiner.find_by_email(&email).await?;
        if let Some(profile) = &invitee {
            if self.membership(group_id, profile.id).await?.is_some() {
                return Err(SyncError::DuplicateEntry(ResourceKind::Member));
            }
        }

        let already_pending = self
            .invitations
            .list(Filter::group(group_id).eq("status", InvitationStatus::Pending.as_str()))
            .await?
            .iter()
            .any(|i| i.invitee_email.eq_ignore_ascii_case(&email));
        if already_pending {
            return Err(SyncError::DuplicateEntry(ResourceKind::Invitation));
        }

        let invitation = self
            .invitations
            .insert(&NewInvitation {
                group_id,
                inviter_id: self.me(),
                invitee_email: email,
                invitee_id: invitee.map(|p| p.id),
            })
            .await?;
        info!(invitation_id = %invitation.id, "Invitation sent");
        Ok(invitation)
    }

    /// Invitations of a group, newest first, with the inviter's profile.
    pub async fn list(&self, group_id: Uuid) -> Result<Vec<Joined<Invitation>>> {
        let invitations = self.invitations.list_by_group(group_id).await?;
        self.joiner.join(invitations).await
    }

    /// Pending invitations addressed to the caller, by id or by email.
    pub async fn pending_for_me(&self) -> Result<Vec<Joined<Invitation>>> {
        let pending: Vec<Invitation> = self
            .invitations
            .list(Filter::new().eq("status", InvitationStatus::Pending.as_str()))
            .await?
            .into_iter()
            .filter(|i| self.addressed_to_me(i))
            .collect();
        self.joiner.join(pending).await
    }

    async fn pending_invitation(&self, invitation_id: Uuid) -> Result<Invitation> {
        let invitation = self.invitations.get(invitation_id).await?;
        if !self.addressed_to_me(&invitation) {
            return Err(SyncError::NotAuthorized(
                "invitation is addressed to someone else".to_string(),
            ));
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(SyncError::validation(
                "status",
                format!("This invitation was already {}", invitation.status.as_str()),
            ));
        }
        Ok(invitation)
    }

    /// Accept an invitation and join its group.
    #[tracing::instrument(name = "invitations.accept", skip_all, fields(invitation_id = %invitation_id, user_id = %self.me()))]
    pub async fn accept(&self, invitation_id: Uuid) -> Result<GroupMember> {
        let invitation = self.pending_invitation(invitation_id).await?;
        let group_id = invitation.group_id;

        self.invitations
            .update(
                invitation_id,
                patch(json!({
                    "status": InvitationStatus::Accepted.as_str(),
                    "invitee_id": self.me().to_string(),
                })),
            )
            .await?;

        let joined = self
            .members
            .insert(&NewMember {
                group_id,
                user_id: self.me(),
                role: MemberRole::Member,
            })
            .await;

        match joined {
            Ok(member) => {
                info!(group_id = %group_id, "Invitation accepted");
                Ok(member)
            }
            Err(SyncError::DuplicateEntry(ResourceKind::Member)) => {
                info!(group_id = %group_id, "Already a member, acceptance kept");
                self.membership(group_id, self.me())
                    .await?
                    .ok_or_else(|| SyncError::not_found(ResourceKind::Member, self.me()))
            }
            Err(err) => {
                warn!(group_id = %group_id, error = %err, "Membership insert failed, reverting invitation");
                let revert = self
                    .invitations
                    .update(
                        invitation_id,
                        patch(json!({ "status": InvitationStatus::Pending.as_str() })),
                    )
                    .await;
                if let Err(undo) = revert {
                    error!(error = %undo, "Failed to revert invitation to pending");
                }
                Err(err)
            }
        }
    }

    #[tracing::instrument(name = "invitations.decline", skip_all, fields(invitation_id = %invitation_id))]
    pub async fn decline(&self, invitation_id: Uuid) -> Result<Invitation> {
        self.pending_invitation(invitation_id).await?;
        let declined = self
            .invitations
            .update(
                invitation_id,
                patch(json!({ "status": InvitationStatus::Declined.as_str() })),
            )
            .await?;
        info!("Invitation declined");
        Ok(declined)
    }

    /// Withdraw an invitation. Owner or admin only.
    pub async fn revoke(&self, invitation_id: Uuid) -> Result<()> {
        self.invitations.delete(invitation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::Table;
    use crate::model::TripGroup;
    use crate::test_utils::Sandbox;

    async fn setup(sandbox: &Sandbox) -> (Session, Session, TripGroup) {
        let asha = sandbox.sign_up("asha@example.com", Some("Asha")).await;
        let ravi = sandbox.sign_up("Ravi@Example.com", None).await;
        let group = sandbox.group(&asha, "Meghalaya", None).await;
        (asha, ravi, group)
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email(" ravi@example.com "));
        assert!(!is_valid_email("ravi"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ravi@example"));
        assert!(!is_valid_email("ravi@@example.com"));
        assert!(!is_valid_email("ra vi@example.com"));
    }

    #[tokio::test]
    async fn test_send_resolves_invitee_and_accept_joins() {
        let sandbox = Sandbox::new();
        let (asha, ravi, group) = setup(&sandbox).await;

        let sent = sandbox
            .services(&asha)
            .invitations()
            .send(group.id, "ravi@example.com")
            .await
            .unwrap();
        assert_eq!(sent.invitee_id, Some(ravi.user_id));
        assert_eq!(sent.status, InvitationStatus::Pending);

        let ravis = sandbox.services(&ravi).invitations();
        let pending = ravis.pending_for_me().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].author.display_name, "Asha");

        let member = ravis.accept(sent.id).await.unwrap();
        assert_eq!(member.group_id, group.id);
        assert_eq!(member.role, MemberRole::Member);
        assert!(ravis.pending_for_me().await.unwrap().is_empty());

        let listed = sandbox.services(&asha).invitations().list(group.id).await.unwrap();
        assert_eq!(listed[0].row.status, InvitationStatus::Accepted);
    }

    #[tokio::test]
    async fn test_invite_by_email_before_sign_up() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", None).await;
        let group = sandbox.group(&asha, "Pondicherry", None).await;

        let sent = sandbox
            .services(&asha)
            .invitations()
            .send(group.id, "meera@example.com")
            .await
            .unwrap();
        assert_eq!(sent.invitee_id, None);

        let meera = sandbox.sign_up("MEERA@example.com", None).await;
        let member = sandbox.services(&meera).invitations().accept(sent.id).await.unwrap();
        assert_eq!(member.user_id, meera.user_id);
    }

    #[tokio::test]
    async fn test_send_rejections() {
        let sandbox = Sandbox::new();
        let (asha, ravi, group) = setup(&sandbox).await;
        let invitations = sandbox.services(&asha).invitations();

        let err = invitations.send(group.id, "not-an-email").await.unwrap_err();
        assert!(err.is_inline());

        let err = invitations.send(group.id, "asha@example.com").await.unwrap_err();
        assert!(matches!(err, SyncError::DuplicateEntry(ResourceKind::Member)));

        invitations.send(group.id, "ravi@example.com").await.unwrap();
        let err = invitations.send(group.id, "RAVI@example.com").await.unwrap_err();
        assert!(matches!(err, SyncError::DuplicateEntry(ResourceKind::Invitation)));

        let err = sandbox
            .services(&ravi)
            .invitations()
            .send(group.id, "meera@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn test_failed_membership_reverts_to_pending() {
        let sandbox = Sandbox::new();
        let (asha, ravi, group) = setup(&sandbox).await;
        let sent = sandbox
            .services(&asha)
            .invitations()
            .send(group.id, "ravi@example.com")
            .await
            .unwrap();

        sandbox
            .backend
            .set_fail_on_insert(Table::TripGroupMembers, true)
            .await;
        let ravis = sandbox.services(&ravi).invitations();
        let err = ravis.accept(sent.id).await.unwrap_err();
        assert!(err.is_retryable());

        let pending = ravis.pending_for_me().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].row.status, InvitationStatus::Pending);

        sandbox
            .backend
            .set_fail_on_insert(Table::TripGroupMembers, false)
            .await;
        assert!(ravis.accept(sent.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_accept_when_already_member_keeps_acceptance() {
        let sandbox = Sandbox::new();
        let (asha, ravi, group) = setup(&sandbox).await;
        let sent = sandbox
            .services(&asha)
            .invitations()
            .send(group.id, "ravi@example.com")
            .await
            .unwrap();
        sandbox.join(&asha, group.id, &ravi).await;

        let member = sandbox.services(&ravi).invitations().accept(sent.id).await.unwrap();
        assert_eq!(member.user_id, ravi.user_id);

        let listed = sandbox.services(&asha).invitations().list(group.id).await.unwrap();
        assert_eq!(listed[0].row.status, InvitationStatus::Accepted);
    }

    #[tokio::test]
    async fn test_decline_and_foreign_accept() {
        let sandbox = Sandbox::new();
        let (asha, ravi, group) = setup(&sandbox).await;
        let meera = sandbox.sign_up("meera@example.com", None).await;
        let sent = sandbox
            .services(&asha)
            .invitations()
            .send(group.id, "ravi@example.com")
            .await
            .unwrap();

        let err = sandbox.services(&meera).invitations().accept(sent.id).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::NotAuthorized(_) | SyncError::NotFound { .. }
        ));

        let ravis = sandbox.services(&ravi).invitations();
        let declined = ravis.decline(sent.id).await.unwrap();
        assert_eq!(declined.status, InvitationStatus::Declined);

        let err = ravis.accept(sent.id).await.unwrap_err();
        assert!(matches!(err, SyncError::Validation { field: "status", .. }));
    }
}
