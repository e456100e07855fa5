//! Destination vote tally.

use uuid::Uuid;

use super::one_decimal;
use crate::model::DestinationVote;

/// Votes for one destination name within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTally {
    pub destination_name: String,
    /// Details of the first vote cast for the name.
    pub destination_state: Option<String>,
    pub category: Option<String>,
    pub cost: Option<f64>,
    pub duration: Option<String>,
    pub count: usize,
    /// Share of all votes in the group, 0-100 with one decimal.
    pub percentage: f64,
    pub voters: Vec<Uuid>,
    /// Whether the viewing user is among the voters.
    pub user_voted: bool,
}

/// Group votes by exact destination name, most votes first. Equal counts
/// keep the order in which the name first appeared.
pub fn tally_votes(votes: &[DestinationVote], viewer: Option<Uuid>) -> Vec<VoteTally> {
    let mut tallies: Vec<VoteTally> = Vec::new();
    for vote in votes {
        let index = match tallies
            .iter()
            .position(|t| t.destination_name == vote.destination_name)
        {
            Some(index) => index,
            None => {
                tallies.push(VoteTally {
                    destination_name: vote.destination_name.clone(),
                    destination_state: vote.destination_state.clone(),
                    category: vote.category.clone(),
                    cost: vote.cost,
                    duration: vote.duration.clone(),
                    count: 0,
                    percentage: 0.0,
                    voters: Vec::new(),
                    user_voted: false,
                });
                tallies.len() - 1
            }
        };
        let tally = &mut tallies[index];
        tally.count += 1;
        tally.voters.push(vote.user_id);
        if viewer == Some(vote.user_id) {
            tally.user_voted = true;
        }
    }

    let total = votes.len();
    for tally in &mut tallies {
        tally.percentage = if total > 0 {
            one_decimal(tally.count as f64 / total as f64 * 100.0)
        } else {
            0.0
        };
    }

    // Stable, so ties stay in first-appearance order
    tallies.sort_by(|a, b| b.count.cmp(&a.count));
    tallies
}
