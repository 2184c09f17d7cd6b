use proptest::prelude::*;

use agora_election::{Election, ElectionCall, ElectionEvent, Proposal, TallyEngine};
use agora_types::{Identity, Phase};

fn identity() -> impl Strategy<Value = Identity> {
    prop::sample::select(vec!["admin", "a", "b", "c", "mallory"]).prop_map(Identity::new)
}

fn call() -> impl Strategy<Value = ElectionCall> {
    prop_oneof![
        (identity(), identity())
            .prop_map(|(caller, voter)| ElectionCall::RegisterVoter { caller, voter }),
        (identity(), prop::collection::vec(identity(), 0..4))
            .prop_map(|(caller, voters)| ElectionCall::RegisterVoters { caller, voters }),
        (identity(), identity())
            .prop_map(|(caller, voter)| ElectionCall::UnregisterVoter { caller, voter }),
        identity().prop_map(|caller| ElectionCall::OpenProposalIntake { caller }),
        identity().prop_map(|caller| ElectionCall::CloseProposalIntake { caller }),
        identity().prop_map(|caller| ElectionCall::OpenBalloting { caller }),
        identity().prop_map(|caller| ElectionCall::CloseBalloting { caller }),
        identity().prop_map(|caller| ElectionCall::Tally { caller }),
        (identity(), prop::sample::select(vec!["", "P"])).prop_map(|(caller, d)| {
            ElectionCall::SubmitProposal {
                caller,
                description: d.to_string(),
            }
        }),
        (identity(), 0u32..4).prop_map(|(caller, proposal)| ElectionCall::Vote { caller, proposal }),
    ]
}

proptest! {
    /// Arbitrary call sequences keep every structural invariant, failed calls
    /// change nothing, and the phase only ever moves one step forward.
    #[test]
    fn invariants_hold_for_any_call_sequence(calls in prop::collection::vec(call(), 0..120)) {
        let mut election = Election::new(Identity::new("admin"));
        let mut successful_voters = Vec::new();

        for call in &calls {
            let before = election.clone();
            match election.apply(call) {
                Ok(events) => {
                    let phase_changes = events
                        .iter()
                        .filter(|e| matches!(e, ElectionEvent::PhaseChanged { .. }))
                        .count();
                    if phase_changes == 1 {
                        prop_assert_eq!(before.phase().successor(), Some(election.phase()));
                    } else {
                        prop_assert_eq!(phase_changes, 0);
                        prop_assert_eq!(before.phase(), election.phase());
                    }
                    if let ElectionCall::Vote { caller, .. } = call {
                        prop_assert!(!successful_voters.contains(caller));
                        successful_voters.push(caller.clone());
                    }
                }
                Err(_) => prop_assert_eq!(&election, &before),
            }

            prop_assert_eq!(
                election.proposal_count() > 0,
                election.phase() != Phase::Registration
            );
            let total: u64 = election.proposals().iter().map(|p| p.vote_count).sum();
            prop_assert_eq!(total as usize, successful_voters.len());
            prop_assert_eq!(election.voted_count(), successful_voters.len());
            prop_assert!(election.snapshot().validate().is_ok());
        }
    }

    /// The tally winner is the first index holding the maximum and the tie set
    /// is every index holding a non-zero maximum.
    #[test]
    fn tally_is_deterministic_first_max(counts in prop::collection::vec(0u64..5, 1..10)) {
        let proposals: Vec<Proposal> = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| Proposal {
                description: if i == 0 { String::new() } else { format!("P{i}") },
                vote_count: c,
            })
            .collect();

        let first = TallyEngine.tally(&proposals);
        let second = TallyEngine.tally(&proposals);
        prop_assert_eq!(&first, &second);

        let max = counts.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(first.result.winning_vote_count, max);
        if max == 0 {
            prop_assert_eq!(first.result.winning_index, 0);
            prop_assert!(first.tie_set.is_empty());
        } else {
            let expected_first = counts.iter().position(|&c| c == max).unwrap() as u32;
            let expected_ties: Vec<u32> = counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == max)
                .map(|(i, _)| i as u32)
                .collect();
            prop_assert_eq!(first.result.winning_index, expected_first);
            prop_assert_eq!(first.tie_set, expected_ties);
        }
    }
}
