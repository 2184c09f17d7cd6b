#![no_main]

use agora_election::{Election, ElectionCall};
use agora_types::Identity;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 4] = ["admin", "a", "b", "c"];

#[derive(Arbitrary, Debug)]
enum Op {
    Register(u8, u8),
    RegisterMany(u8, Vec<u8>),
    Unregister(u8, u8),
    OpenIntake(u8),
    CloseIntake(u8),
    OpenBalloting(u8),
    CloseBalloting(u8),
    Tally(u8),
    Submit(u8, bool),
    Vote(u8, u8),
}

fn who(n: u8) -> Identity {
    Identity::new(NAMES[n as usize % NAMES.len()])
}

impl Op {
    fn call(&self) -> ElectionCall {
        match *self {
            Op::Register(c, v) => ElectionCall::RegisterVoter { caller: who(c), voter: who(v) },
            Op::RegisterMany(c, ref vs) => ElectionCall::RegisterVoters {
                caller: who(c),
                voters: vs.iter().map(|&v| who(v)).collect(),
            },
            Op::Unregister(c, v) => ElectionCall::UnregisterVoter { caller: who(c), voter: who(v) },
            Op::OpenIntake(c) => ElectionCall::OpenProposalIntake { caller: who(c) },
            Op::CloseIntake(c) => ElectionCall::CloseProposalIntake { caller: who(c) },
            Op::OpenBalloting(c) => ElectionCall::OpenBalloting { caller: who(c) },
            Op::CloseBalloting(c) => ElectionCall::CloseBalloting { caller: who(c) },
            Op::Tally(c) => ElectionCall::Tally { caller: who(c) },
            Op::Submit(c, empty) => ElectionCall::SubmitProposal {
                caller: who(c),
                description: if empty { String::new() } else { "P".into() },
            },
            Op::Vote(c, p) => ElectionCall::Vote { caller: who(c), proposal: u32::from(p % 5) },
        }
    }
}

// Any call sequence leaves the election in a state its own snapshot
// validation accepts, and a rejected call changes nothing.
fuzz_target!(|ops: Vec<Op>| {
    let mut election = Election::new(Identity::new("admin"));
    for op in &ops {
        let before = election.clone();
        if election.apply(&op.call()).is_err() {
            assert_eq!(election, before);
        }
        election
            .snapshot()
            .validate()
            .expect("reachable state must validate");
    }
});
