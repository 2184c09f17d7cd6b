//! Property: replaying the accepted calls of any run reproduces its state.

use agora_election::{Election, ElectionCall};
use agora_node::{replay, JournalEntry};
use agora_types::{Identity, Timestamp};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["admin", "a", "b", "c"];

fn who(i: usize) -> Identity {
    Identity::new(NAMES[i % NAMES.len()])
}

fn arb_call() -> impl Strategy<Value = ElectionCall> {
    prop_oneof![
        (0..4usize, 0..4usize)
            .prop_map(|(c, v)| ElectionCall::RegisterVoter { caller: who(c), voter: who(v) }),
        (0..4usize, 0..4usize)
            .prop_map(|(c, v)| ElectionCall::UnregisterVoter { caller: who(c), voter: who(v) }),
        (0..4usize).prop_map(|c| ElectionCall::OpenProposalIntake { caller: who(c) }),
        (0..4usize).prop_map(|c| ElectionCall::CloseProposalIntake { caller: who(c) }),
        (0..4usize).prop_map(|c| ElectionCall::OpenBalloting { caller: who(c) }),
        (0..4usize).prop_map(|c| ElectionCall::CloseBalloting { caller: who(c) }),
        (0..4usize).prop_map(|c| ElectionCall::Tally { caller: who(c) }),
        (0..4usize, "[a-z]{0,3}").prop_map(|(c, d)| ElectionCall::SubmitProposal {
            caller: who(c),
            description: d,
        }),
        (0..4usize, 0..5u32).prop_map(|(c, p)| ElectionCall::Vote { caller: who(c), proposal: p }),
    ]
}

proptest! {
    #[test]
    fn replay_of_accepted_calls_matches_live_state(calls in prop::collection::vec(arb_call(), 0..80)) {
        let mut live = Election::new(who(0));
        let mut journal = Vec::new();
        for call in calls {
            if live.apply(&call).is_ok() {
                let seq = journal.len() as u64;
                journal.push(JournalEntry { seq, accepted_at: Timestamp::new(seq), call });
            }
        }
        let replayed = replay(who(0), &journal).unwrap();
        prop_assert_eq!(replayed, live);
    }
}
