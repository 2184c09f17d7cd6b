#![no_main]

use agora_node::JournalEntry;
use libfuzzer_sys::fuzz_target;

// Journal entries come from disk; decoding garbage must fail cleanly.
fuzz_target!(|data: &[u8]| {
    if let Ok(entry) = JournalEntry::decode(data) {
        let bytes = entry.encode().expect("decoded entry must encode");
        assert_eq!(JournalEntry::decode(&bytes).expect("roundtrip"), entry);
    }
});
