#![no_main]

use coauthor_graph::client::{parse_atom_feed, split_author_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_atom_feed(text);
        let _ = split_author_name(text).identity();
    }
});
