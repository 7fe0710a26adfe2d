#![no_main]

use coauthor_graph::models::AuthorProfile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Hand-edited result files must never panic the loader
    let _ = serde_json::from_slice::<AuthorProfile>(data);
});
