//! Data models for publication records, author profiles and graph tables.
//!
//! Persisted models derive `Serialize`/`Deserialize`; map-valued fields use
//! `BTreeMap` so that files and tables come out in a stable order.

mod graph;
mod profile;
mod record;
mod table;

pub use graph::CollaborationGraph;
pub use profile::{AuthorProfile, Position};
pub use record::{
    ARXIV_PREFIX, Citations, Publication, PublicationId, RawAuthor, RawRecord, Source,
    UNAVAILABLE_MARKER,
};
pub use table::{EdgeRow, GraphTables, NodeRow};
