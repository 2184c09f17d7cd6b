//! Serializable election state for durable storage.
//!
//! Loading re-checks the structural invariants, so a snapshot that could
//! never have been produced by accepted calls is refused instead of restored.

use agora_types::{Identity, Phase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::access::AccessControl;
use crate::election::Election;
use crate::error::ElectionError;
use crate::proposal::{Proposal, ProposalLedger};
use crate::registry::{Voter, VoterRegistry};
use crate::tally::{TallyEngine, TallyResult};
use crate::workflow::Workflow;

/// Everything needed to restore an election instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSnapshot {
    pub authority: Identity,
    pub phase: Phase,
    pub proposals: Vec<Proposal>,
    pub voters: BTreeMap<Identity, Voter>,
    pub tally_result: Option<TallyResult>,
}

impl ElectionSnapshot {
    /// Check the invariants every reachable election state satisfies.
    pub fn validate(&self) -> Result<(), ElectionError> {
        let corrupt = |msg: String| Err(ElectionError::CorruptSnapshot(msg));

        let sentinel_expected = self.phase != Phase::Registration;
        match self.proposals.first() {
            Some(_) if !sentinel_expected => {
                return corrupt("proposals present during registration".into())
            }
            None if sentinel_expected => {
                return corrupt(format!("missing sentinel proposal in phase {}", self.phase))
            }
            Some(sentinel) if !sentinel.is_abstention() => {
                return corrupt("proposal 0 is not the abstention sentinel".into())
            }
            _ => {}
        }
        if self.proposals.iter().skip(1).any(Proposal::is_abstention) {
            return corrupt("non-sentinel proposal with empty description".into());
        }
        if self.phase >= Phase::ProposalIntakeClosed && self.proposals.len() < 2 {
            return corrupt("intake closed without any proposal".into());
        }

        if (self.phase == Phase::Tallied) != self.tally_result.is_some() {
            return corrupt(format!(
                "tally result presence does not match phase {}",
                self.phase
            ));
        }

        let mut counts = vec![0u64; self.proposals.len()];
        for (id, voter) in &self.voters {
            match (voter.has_voted, voter.voted_proposal) {
                (false, None) => {}
                (true, Some(index)) => match counts.get_mut(index as usize) {
                    Some(c) if self.phase >= Phase::Balloting => *c += 1,
                    Some(_) => return corrupt(format!("voter {id} voted before balloting")),
                    None => {
                        return corrupt(format!("voter {id} voted for missing proposal {index}"))
                    }
                },
                _ => return corrupt(format!("voter {id} has an inconsistent ballot record")),
            }
        }
        for (index, (proposal, expected)) in self.proposals.iter().zip(&counts).enumerate() {
            if proposal.vote_count != *expected {
                return corrupt(format!(
                    "proposal {index} counts {} votes, ballots say {expected}",
                    proposal.vote_count
                ));
            }
        }

        if let Some(result) = &self.tally_result {
            if *result != TallyEngine.tally(&self.proposals).result {
                return corrupt("tally result does not match a fresh tally".into());
            }
        }
        Ok(())
    }
}

impl Election {
    pub fn snapshot(&self) -> ElectionSnapshot {
        ElectionSnapshot {
            authority: self.access.authority().clone(),
            phase: self.workflow.phase(),
            proposals: self.proposals.as_slice().to_vec(),
            voters: self.registry.records().clone(),
            tally_result: self.tally_result.clone(),
        }
    }

    /// Restore an election from a validated snapshot.
    pub fn from_snapshot(snapshot: ElectionSnapshot) -> Result<Self, ElectionError> {
        snapshot.validate()?;
        Ok(Self {
            access: AccessControl::new(snapshot.authority),
            workflow: Workflow::at(snapshot.phase),
            registry: VoterRegistry::from_records(snapshot.voters),
            proposals: ProposalLedger::from_proposals(snapshot.proposals),
            tally_result: snapshot.tally_result,
        })
    }

    /// Serialize the election state for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, ElectionError> {
        bincode::serialize(&self.snapshot())
            .map_err(|e| ElectionError::SnapshotEncode(e.to_string()))
    }

    /// Restore the election state from serialized bytes.
    pub fn load_state(data: &[u8]) -> Result<Self, ElectionError> {
        let snapshot: ElectionSnapshot = bincode::deserialize(data)
            .map_err(|e| ElectionError::CorruptSnapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Identity {
        Identity::new(name)
    }

    fn mid_ballot() -> Election {
        let admin = id("admin");
        let mut e = Election::new(admin.clone());
        e.register_voters(&admin, &[id("a"), id("b"), id("c")]).unwrap();
        e.open_proposal_intake(&admin).unwrap();
        e.submit_proposal(&id("a"), "P1").unwrap();
        e.close_proposal_intake(&admin).unwrap();
        e.open_balloting(&admin).unwrap();
        e.vote(&id("a"), 1).unwrap();
        e.vote(&id("b"), 0).unwrap();
        e
    }

    #[test]
    fn save_then_load_restores_equal_election() {
        let e = mid_ballot();
        let bytes = e.save_state().unwrap();
        let restored = Election::load_state(&bytes).unwrap();
        assert_eq!(restored, e);
        assert_eq!(restored.voter(&id("a")).voted_proposal, Some(1));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(matches!(
            Election::load_state(&[0xff, 0x01, 0x02]),
            Err(ElectionError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn missing_sentinel_is_rejected() {
        let mut snapshot = mid_ballot().snapshot();
        snapshot.proposals.clear();
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn inflated_vote_count_is_rejected() {
        let mut snapshot = mid_ballot().snapshot();
        snapshot.proposals[1].vote_count += 1;
        assert!(matches!(
            Election::from_snapshot(snapshot),
            Err(ElectionError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn tally_result_outside_tallied_is_rejected() {
        let mut snapshot = mid_ballot().snapshot();
        snapshot.tally_result = Some(TallyResult {
            winning_index: 1,
            winning_description: "P1".into(),
            winning_vote_count: 1,
        });
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn tally_result_naming_a_later_tied_proposal_is_rejected() {
        let admin = id("admin");
        let mut e = Election::new(admin.clone());
        e.register_voters(&admin, &[id("a"), id("b")]).unwrap();
        e.open_proposal_intake(&admin).unwrap();
        e.submit_proposal(&id("a"), "P1").unwrap();
        e.submit_proposal(&id("b"), "P2").unwrap();
        e.close_proposal_intake(&admin).unwrap();
        e.open_balloting(&admin).unwrap();
        e.vote(&id("a"), 1).unwrap();
        e.vote(&id("b"), 2).unwrap();
        e.close_balloting(&admin).unwrap();
        e.tally(&admin).unwrap();

        let mut snapshot = e.snapshot();
        assert!(snapshot.validate().is_ok());
        snapshot.tally_result = Some(TallyResult {
            winning_index: 2,
            winning_description: "P2".into(),
            winning_vote_count: 1,
        });
        assert!(matches!(
            Election::from_snapshot(snapshot),
            Err(ElectionError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn fresh_election_snapshot_is_valid() {
        let e = Election::new(id("admin"));
        let snapshot = e.snapshot();
        assert!(snapshot.proposals.is_empty());
        assert_eq!(Election::from_snapshot(snapshot).unwrap(), e);
    }
}
