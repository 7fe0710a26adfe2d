#![no_main]

use coauthor_graph::client::parse_efetch_xml;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed XML must surface as an error, never a panic
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = parse_efetch_xml(xml);
    }
});
