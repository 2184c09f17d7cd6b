//! Winner selection with tie detection.
//!
//! One left-to-right pass over the proposals. The first index to reach the
//! running maximum keeps the lead; only a strictly greater count displaces
//! it. With no votes at all the abstention sentinel (index 0) wins.

use agora_types::{ProposalIndex, SENTINEL_INDEX};
use serde::{Deserialize, Serialize};

use crate::proposal::Proposal;

/// The fixed outcome of a tallied election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub winning_index: ProposalIndex,
    pub winning_description: String,
    pub winning_vote_count: u64,
}

/// Result of one tally pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyOutcome {
    pub result: TallyResult,
    /// Indices sharing the maximum count, in index order. Empty when no
    /// proposal received a vote.
    pub tie_set: Vec<ProposalIndex>,
}

impl TallyOutcome {
    /// Whether more than one proposal shares the maximum.
    pub fn is_tie(&self) -> bool {
        self.tie_set.len() > 1
    }
}

pub struct TallyEngine;

impl TallyEngine {
    pub fn tally(&self, proposals: &[Proposal]) -> TallyOutcome {
        let mut max_count = 0u64;
        let mut winning_index = SENTINEL_INDEX;
        let mut tie_set = Vec::new();

        for (i, proposal) in proposals.iter().enumerate() {
            let i = i as ProposalIndex;
            let count = proposal.vote_count;
            if count > max_count {
                max_count = count;
                winning_index = i;
                tie_set.clear();
                tie_set.push(i);
            } else if count == max_count && count > 0 {
                tie_set.push(i);
            }
        }

        let winning_description = proposals
            .get(winning_index as usize)
            .map(|p| p.description.clone())
            .unwrap_or_default();

        TallyOutcome {
            result: TallyResult {
                winning_index,
                winning_description,
                winning_vote_count: max_count,
            },
            tie_set,
        }
    }
}
