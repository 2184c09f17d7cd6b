//! The election instance: phase gate, role checks and state, composed.
//!
//! Every mutating call checks, in order: phase, caller role, then the
//! operation's own rules. All checks complete before anything is written,
//! so a rejected call leaves the election exactly as it was.

use agora_types::{Identity, Phase, ProposalIndex};

use crate::access::AccessControl;
use crate::call::ElectionCall;
use crate::error::ElectionError;
use crate::event::ElectionEvent;
use crate::proposal::{Proposal, ProposalLedger};
use crate::registry::{Voter, VoterRegistry};
use crate::tally::{TallyEngine, TallyResult};
use crate::voting::VotingEngine;
use crate::workflow::{Transition, Workflow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Election {
    pub(crate) access: AccessControl,
    pub(crate) workflow: Workflow,
    pub(crate) registry: VoterRegistry,
    pub(crate) proposals: ProposalLedger,
    pub(crate) tally_result: Option<TallyResult>,
}

type Events = Result<Vec<ElectionEvent>, ElectionError>;

impl Election {
    /// Start a new election in the registration phase.
    pub fn new(authority: Identity) -> Self {
        Self {
            access: AccessControl::new(authority),
            workflow: Workflow::new(),
            registry: VoterRegistry::new(),
            proposals: ProposalLedger::new(),
            tally_result: None,
        }
    }

    /// Apply one call.
    pub fn apply(&mut self, call: &ElectionCall) -> Events {
        match call {
            ElectionCall::RegisterVoter { caller, voter } => self.register_voter(caller, voter),
            ElectionCall::RegisterVoters { caller, voters } => {
                self.register_voters(caller, voters)
            }
            ElectionCall::UnregisterVoter { caller, voter } => {
                self.unregister_voter(caller, voter)
            }
            ElectionCall::OpenProposalIntake { caller } => self.open_proposal_intake(caller),
            ElectionCall::CloseProposalIntake { caller } => self.close_proposal_intake(caller),
            ElectionCall::OpenBalloting { caller } => self.open_balloting(caller),
            ElectionCall::CloseBalloting { caller } => self.close_balloting(caller),
            ElectionCall::Tally { caller } => self.tally(caller),
            ElectionCall::SubmitProposal {
                caller,
                description,
            } => self.submit_proposal(caller, description),
            ElectionCall::Vote { caller, proposal } => self.vote(caller, *proposal),
        }
    }

    // ── Registry ────────────────────────────────────────────────────────

    pub fn register_voter(&mut self, caller: &Identity, voter: &Identity) -> Events {
        self.workflow.require(Phase::Registration)?;
        self.access.require_authority(caller)?;
        self.registry.register(voter)?;
        tracing::debug!(%voter, "voter registered");
        Ok(vec![ElectionEvent::VoterRegistered(voter.clone())])
    }

    /// Register a batch. Identities already registered are skipped, not rejected.
    pub fn register_voters(&mut self, caller: &Identity, voters: &[Identity]) -> Events {
        self.workflow.require(Phase::Registration)?;
        self.access.require_authority(caller)?;
        let added = self.registry.register_many(voters);
        tracing::debug!(
            requested = voters.len(),
            added = added.len(),
            "voter batch registered"
        );
        Ok(added.into_iter().map(ElectionEvent::VoterRegistered).collect())
    }

    pub fn unregister_voter(&mut self, caller: &Identity, voter: &Identity) -> Events {
        self.workflow.require(Phase::Registration)?;
        self.access.require_authority(caller)?;
        self.registry.unregister(voter)?;
        tracing::debug!(%voter, "voter unregistered");
        Ok(vec![ElectionEvent::VoterUnregistered(voter.clone())])
    }

    // ── Workflow ────────────────────────────────────────────────────────

    fn authorize_transition(
        &self,
        caller: &Identity,
        transition: Transition,
    ) -> Result<(), ElectionError> {
        self.workflow.require(transition.source())?;
        self.access.require_authority(caller)
    }

    pub fn open_proposal_intake(&mut self, caller: &Identity) -> Events {
        self.authorize_transition(caller, Transition::OpenProposalIntake)?;
        let changed = self.workflow.advance(Transition::OpenProposalIntake)?;
        self.proposals.open_sentinel();
        Ok(vec![changed])
    }

    pub fn close_proposal_intake(&mut self, caller: &Identity) -> Events {
        self.authorize_transition(caller, Transition::CloseProposalIntake)?;
        if !self.proposals.has_real_proposals() {
            return Err(ElectionError::NoProposals);
        }
        Ok(vec![self.workflow.advance(Transition::CloseProposalIntake)?])
    }

    pub fn open_balloting(&mut self, caller: &Identity) -> Events {
        self.authorize_transition(caller, Transition::OpenBalloting)?;
        Ok(vec![self.workflow.advance(Transition::OpenBalloting)?])
    }

    pub fn close_balloting(&mut self, caller: &Identity) -> Events {
        self.authorize_transition(caller, Transition::CloseBalloting)?;
        Ok(vec![self.workflow.advance(Transition::CloseBalloting)?])
    }

    /// Close the election and fix its result.
    ///
    /// Emits `ProposalTie` (when more than one proposal shares the maximum)
    /// followed by `PhaseChanged`.
    pub fn tally(&mut self, caller: &Identity) -> Events {
        self.authorize_transition(caller, Transition::Tally)?;
        let outcome = TallyEngine.tally(self.proposals.as_slice());

        let mut events = Vec::with_capacity(2);
        if outcome.is_tie() {
            tracing::info!(tied = ?outcome.tie_set, "proposal tie detected");
            events.push(ElectionEvent::ProposalTie(outcome.tie_set.clone()));
        }
        events.push(self.workflow.advance(Transition::Tally)?);

        tracing::info!(
            winner = outcome.result.winning_index,
            votes = outcome.result.winning_vote_count,
            "election tallied"
        );
        self.tally_result = Some(outcome.result);
        Ok(events)
    }

    // ── Electorate ──────────────────────────────────────────────────────

    pub fn submit_proposal(&mut self, caller: &Identity, description: &str) -> Events {
        self.workflow.require(Phase::ProposalIntake)?;
        self.access.require_registered_voter(&self.registry, caller)?;
        let index = self.proposals.submit(description)?;
        tracing::debug!(%caller, index, "proposal registered");
        Ok(vec![ElectionEvent::ProposalRegistered(index)])
    }

    pub fn vote(&mut self, caller: &Identity, proposal: ProposalIndex) -> Events {
        self.workflow.require(Phase::Balloting)?;
        self.access.require_registered_voter(&self.registry, caller)?;
        VotingEngine.cast(&mut self.registry, &mut self.proposals, caller, proposal)?;
        Ok(vec![ElectionEvent::Voted {
            voter: caller.clone(),
            proposal,
        }])
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    pub fn authority(&self) -> &Identity {
        self.access.authority()
    }

    pub fn voter(&self, id: &Identity) -> Voter {
        self.registry.get(id)
    }

    pub fn proposal(&self, index: ProposalIndex) -> Result<&Proposal, ElectionError> {
        self.proposals.get(index)
    }

    pub fn proposal_count(&self) -> ProposalIndex {
        self.proposals.count()
    }

    pub fn proposals(&self) -> &[Proposal] {
        self.proposals.as_slice()
    }

    pub fn tally_result(&self) -> Result<&TallyResult, ElectionError> {
        self.tally_result.as_ref().ok_or(ElectionError::NotTalliedYet)
    }

    pub fn registered_count(&self) -> usize {
        self.registry.registered_count()
    }

    pub fn voted_count(&self) -> usize {
        self.registry.voted_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Identity {
        Identity::new(name)
    }

    fn admin() -> Identity {
        id("admin")
    }

    /// An election in balloting with voters a, b and proposals P1, P2.
    fn balloting() -> Election {
        let mut e = Election::new(admin());
        e.register_voters(&admin(), &[id("a"), id("b")]).unwrap();
        e.open_proposal_intake(&admin()).unwrap();
        e.submit_proposal(&id("a"), "P1").unwrap();
        e.submit_proposal(&id("b"), "P2").unwrap();
        e.close_proposal_intake(&admin()).unwrap();
        e.open_balloting(&admin()).unwrap();
        e
    }

    #[test]
    fn only_authority_registers() {
        let mut e = Election::new(admin());
        assert_eq!(
            e.register_voter(&id("a"), &id("b")),
            Err(ElectionError::Unauthorized(id("a")))
        );
        assert_eq!(
            e.register_voter(&admin(), &id("b")).unwrap(),
            vec![ElectionEvent::VoterRegistered(id("b"))]
        );
    }

    #[test]
    fn phase_is_checked_before_role() {
        let mut e = Election::new(admin());
        e.open_proposal_intake(&admin()).unwrap();
        let err = e.register_voter(&id("mallory"), &id("b")).unwrap_err();
        assert!(matches!(err, ElectionError::InvalidPhase { .. }));
    }

    #[test]
    fn batch_registration_emits_only_for_new_voters() {
        let mut e = Election::new(admin());
        e.register_voter(&admin(), &id("a")).unwrap();
        let events = e.register_voters(&admin(), &[id("a"), id("b")]).unwrap();
        assert_eq!(events, vec![ElectionEvent::VoterRegistered(id("b"))]);
        assert_eq!(
            e.register_voter(&admin(), &id("b")),
            Err(ElectionError::AlreadyRegistered(id("b")))
        );
    }

    #[test]
    fn opening_intake_creates_sentinel() {
        let mut e = Election::new(admin());
        assert_eq!(e.proposal_count(), 0);
        let events = e.open_proposal_intake(&admin()).unwrap();
        assert_eq!(
            events,
            vec![ElectionEvent::PhaseChanged {
                from: Phase::Registration,
                to: Phase::ProposalIntake
            }]
        );
        assert_eq!(e.proposal_count(), 1);
        assert!(e.proposal(0).unwrap().is_abstention());
    }

    #[test]
    fn registry_frozen_after_registration() {
        let mut e = Election::new(admin());
        e.register_voter(&admin(), &id("a")).unwrap();
        e.open_proposal_intake(&admin()).unwrap();
        assert!(matches!(
            e.unregister_voter(&admin(), &id("a")),
            Err(ElectionError::InvalidPhase { .. })
        ));
        assert!(e.voter(&id("a")).registered);
    }

    #[test]
    fn unregistered_voter_cannot_submit() {
        let mut e = Election::new(admin());
        e.register_voter(&admin(), &id("a")).unwrap();
        e.open_proposal_intake(&admin()).unwrap();
        assert_eq!(
            e.submit_proposal(&id("z"), "P"),
            Err(ElectionError::Unauthorized(id("z")))
        );
        assert_eq!(
            e.submit_proposal(&id("a"), ""),
            Err(ElectionError::EmptyDescription)
        );
        assert_eq!(
            e.submit_proposal(&id("a"), "P").unwrap(),
            vec![ElectionEvent::ProposalRegistered(1)]
        );
    }

    #[test]
    fn closing_intake_requires_a_real_proposal() {
        let mut e = Election::new(admin());
        e.open_proposal_intake(&admin()).unwrap();
        assert_eq!(e.close_proposal_intake(&admin()), Err(ElectionError::NoProposals));
        assert_eq!(e.phase(), Phase::ProposalIntake);
    }

    #[test]
    fn authority_cannot_vote_unless_registered() {
        let mut e = balloting();
        assert_eq!(
            e.vote(&admin(), 1),
            Err(ElectionError::Unauthorized(admin()))
        );
    }

    #[test]
    fn failed_vote_changes_nothing() {
        let mut e = balloting();
        let before = e.clone();
        assert_eq!(e.vote(&id("a"), 7), Err(ElectionError::ProposalNotFound(7)));
        assert_eq!(e, before);
    }

    #[test]
    fn tally_before_closing_is_rejected() {
        let mut e = balloting();
        assert!(matches!(
            e.tally(&admin()),
            Err(ElectionError::InvalidPhase { .. })
        ));
        assert_eq!(e.tally_result(), Err(ElectionError::NotTalliedYet));
    }

    #[test]
    fn tally_event_order_is_tie_then_phase_change() {
        let mut e = balloting();
        e.vote(&id("a"), 1).unwrap();
        e.vote(&id("b"), 2).unwrap();
        e.close_balloting(&admin()).unwrap();
        let events = e.tally(&admin()).unwrap();
        assert_eq!(
            events,
            vec![
                ElectionEvent::ProposalTie(vec![1, 2]),
                ElectionEvent::PhaseChanged {
                    from: Phase::BallotingClosed,
                    to: Phase::Tallied
                },
            ]
        );
    }

    #[test]
    fn apply_dispatches_calls() {
        let mut e = Election::new(admin());
        let events = e
            .apply(&ElectionCall::RegisterVoter {
                caller: admin(),
                voter: id("a"),
            })
            .unwrap();
        assert_eq!(events, vec![ElectionEvent::VoterRegistered(id("a"))]);
        e.apply(&ElectionCall::OpenProposalIntake { caller: admin() })
            .unwrap();
        assert_eq!(e.phase(), Phase::ProposalIntake);
    }
}
