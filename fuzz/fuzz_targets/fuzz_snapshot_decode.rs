#![no_main]

use agora_election::Election;
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes as a snapshot must never panic, and anything that
// decodes must encode back to an election that decodes to the same value.
fuzz_target!(|data: &[u8]| {
    if let Ok(election) = Election::load_state(data) {
        let bytes = election.save_state().expect("restored election must encode");
        let again = Election::load_state(&bytes).expect("re-encoded snapshot must decode");
        assert_eq!(again, election);
    }
});
