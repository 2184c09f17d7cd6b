//! Ballot recording.

use agora_types::{Identity, ProposalIndex};

use crate::error::ElectionError;
use crate::proposal::ProposalLedger;
use crate::registry::VoterRegistry;

/// Records one ballot per registered identity.
///
/// Phase and role checks are the caller's job; the engine checks the
/// ballot itself and applies both halves (voter record and proposal count)
/// only once every check has passed.
pub struct VotingEngine;

impl VotingEngine {
    /// Validate a ballot without applying it.
    pub fn check(
        &self,
        registry: &VoterRegistry,
        ledger: &ProposalLedger,
        voter: &Identity,
        proposal: ProposalIndex,
    ) -> Result<(), ElectionError> {
        registry.check_ballot(voter)?;
        ledger.get(proposal)?;
        Ok(())
    }

    /// Record `voter`'s ballot for `proposal`.
    pub fn cast(
        &self,
        registry: &mut VoterRegistry,
        ledger: &mut ProposalLedger,
        voter: &Identity,
        proposal: ProposalIndex,
    ) -> Result<(), ElectionError> {
        self.check(registry, ledger, voter, proposal)?;
        registry.record_ballot(voter, proposal)?;
        ledger.increment(proposal)?;
        tracing::debug!(%voter, proposal, "ballot recorded");
        Ok(())
    }
}
