//! The append-only proposal ledger.

use agora_types::{ProposalIndex, SENTINEL_INDEX};
use serde::{Deserialize, Serialize};

use crate::error::ElectionError;

/// A proposal and its running vote count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            vote_count: 0,
        }
    }

    /// Whether this is the abstention sentinel (empty description).
    pub fn is_abstention(&self) -> bool {
        self.description.is_empty()
    }
}

/// Ordered proposals; indices are assigned in append order and never reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProposalLedger {
    proposals: Vec<Proposal>,
}

impl ProposalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_proposals(proposals: Vec<Proposal>) -> Self {
        Self { proposals }
    }

    /// Append the abstention sentinel at index 0.
    ///
    /// Only the transition into proposal intake calls this, and it runs once.
    pub(crate) fn open_sentinel(&mut self) {
        debug_assert!(self.proposals.is_empty(), "sentinel appended twice");
        if self.proposals.is_empty() {
            self.proposals.push(Proposal::default());
        }
    }

    /// Append a proposal and return its index.
    pub fn submit(&mut self, description: &str) -> Result<ProposalIndex, ElectionError> {
        if description.is_empty() {
            return Err(ElectionError::EmptyDescription);
        }
        let index = self.count();
        self.proposals.push(Proposal::new(description));
        Ok(index)
    }

    pub fn get(&self, index: ProposalIndex) -> Result<&Proposal, ElectionError> {
        self.proposals
            .get(index as usize)
            .ok_or(ElectionError::ProposalNotFound(index))
    }

    /// Number of proposals, sentinel included.
    pub fn count(&self) -> ProposalIndex {
        self.proposals.len() as ProposalIndex
    }

    /// Whether at least one proposal besides the sentinel exists.
    pub fn has_real_proposals(&self) -> bool {
        self.proposals.len() > SENTINEL_INDEX as usize + 1
    }

    /// Add one vote to the proposal at `index`.
    pub(crate) fn increment(&mut self, index: ProposalIndex) -> Result<(), ElectionError> {
        let proposal = self
            .proposals
            .get_mut(index as usize)
            .ok_or(ElectionError::ProposalNotFound(index))?;
        proposal.vote_count += 1;
        Ok(())
    }

    /// Sum of every proposal's vote count.
    pub fn total_votes(&self) -> u64 {
        self.proposals.iter().map(|p| p.vote_count).sum()
    }

    pub fn as_slice(&self) -> &[Proposal] {
        &self.proposals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_occupies_index_zero() {
        let mut ledger = ProposalLedger::new();
        ledger.open_sentinel();
        assert_eq!(ledger.count(), 1);
        assert!(ledger.get(SENTINEL_INDEX).unwrap().is_abstention());
        assert!(!ledger.has_real_proposals());
    }

    #[test]
    fn submit_appends_in_order() {
        let mut ledger = ProposalLedger::new();
        ledger.open_sentinel();
        assert_eq!(ledger.submit("P1").unwrap(), 1);
        assert_eq!(ledger.submit("P2").unwrap(), 2);
        assert_eq!(ledger.get(2).unwrap().description, "P2");
        assert!(ledger.has_real_proposals());
    }

    #[test]
    fn empty_description_rejected() {
        let mut ledger = ProposalLedger::new();
        ledger.open_sentinel();
        assert_eq!(ledger.submit(""), Err(ElectionError::EmptyDescription));
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn out_of_range_lookup_fails() {
        let ledger = ProposalLedger::new();
        assert_eq!(ledger.get(0), Err(ElectionError::ProposalNotFound(0)));
    }

    #[test]
    fn increment_counts_votes() {
        let mut ledger = ProposalLedger::new();
        ledger.open_sentinel();
        ledger.submit("P1").unwrap();
        ledger.increment(1).unwrap();
        ledger.increment(1).unwrap();
        ledger.increment(0).unwrap();
        assert_eq!(ledger.get(1).unwrap().vote_count, 2);
        assert_eq!(ledger.total_votes(), 3);
        assert_eq!(ledger.increment(5), Err(ElectionError::ProposalNotFound(5)));
    }
}
