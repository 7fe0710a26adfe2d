//! Fuzzing library for coauthor-graph.
//!
//! This crate provides fuzzing targets for the PubMed and arXiv XML parsers,
//! author name normalization and the persisted profile format.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_efetch_parse -- -max_total_time=60
//! ```

pub use coauthor_graph::{client, identity, models};
