//! Destination voting.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{caller, optional_text, required_text};
use crate::aggregates::{tally_votes, VoteTally};
use crate::error::{ResourceKind, Result, SyncError};
use crate::interfaces::{Filter, RowStore};
use crate::model::{DestinationVote, NewVote, ProposedDestination};
use crate::repository::Repository;

#[derive(Clone)]
pub struct VoteService {
    me: Uuid,
    votes: Repository<DestinationVote>,
}

impl VoteService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            votes: Repository::new(store),
        }
    }

    /// Propose a destination; the proposer's vote is the proposal.
    #[tracing::instrument(name = "votes.propose", skip_all, fields(group_id = %group_id))]
    pub async fn propose(
        &self,
        group_id: Uuid,
        destination: ProposedDestination,
    ) -> Result<DestinationVote> {
        let name = required_text(
            "destination_name",
            &destination.name,
            "Please enter a destination",
        )?;
        if matches!(destination.cost, Some(cost) if !(cost.is_finite() && cost >= 0.0)) {
            return Err(SyncError::validation("cost", "Cost cannot be negative"));
        }

        let vote = self
            .votes
            .insert(&NewVote {
                group_id,
                user_id: self.me,
                destination_name: name,
                destination_state: optional_text(destination.state.as_deref()),
                category: optional_text(destination.category.as_deref()),
                cost: destination.cost,
                duration: optional_text(destination.duration.as_deref()),
            })
            .await?;
        info!(destination = %vote.destination_name, "Destination proposed");
        Ok(vote)
    }

    /// Vote for an already proposed destination, copying its details.
    #[tracing::instrument(name = "votes.cast", skip_all, fields(group_id = %group_id))]
    pub async fn cast(&self, group_id: Uuid, destination_name: &str) -> Result<DestinationVote> {
        let proposal = self
            .votes
            .list(Filter::group(group_id).eq("destination_name", destination_name))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::not_found(ResourceKind::Vote, destination_name))?;

        self.votes
            .insert(&NewVote {
                group_id,
                user_id: self.me,
                destination_name: proposal.destination_name,
                destination_state: proposal.destination_state,
                category: proposal.category,
                cost: proposal.cost,
                duration: proposal.duration,
            })
            .await
    }

    /// Standings for a group, most voted first, from the caller's view.
    pub async fn tally(&self, group_id: Uuid) -> Result<Vec<VoteTally>> {
        let votes = self.votes.list_by_group(group_id).await?;
        Ok(tally_votes(&votes, Some(self.me)))
    }
}
