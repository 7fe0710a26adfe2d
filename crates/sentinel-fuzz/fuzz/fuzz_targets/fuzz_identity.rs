#![no_main]

use coauthor_graph::identity::Identity;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (forename, surname) = text.split_once('|').unwrap_or(("", text));

    // Normalization is idempotent and ASCII-only
    let once = Identity::from_parts(forename, surname);
    assert!(once.as_str().is_ascii());
    if once.as_str().matches(", ").count() == 1 {
        assert_eq!(Identity::parse(once.as_str()), once);
    }
});
