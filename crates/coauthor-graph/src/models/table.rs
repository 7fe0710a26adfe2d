//! Node and edge tables derived from a collaboration graph.

use serde::Serialize;

/// One author in the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    /// `"Forename Surname"`.
    pub author: String,

    /// Number of retained papers.
    pub total_papers: usize,

    /// Sole or first authorships.
    pub first_authors: u32,

    /// Sole or last authorships.
    pub last_authors: u32,

    /// Summed known citation counts.
    pub citations: u64,

    /// Most frequent lower-cased keyword, or empty.
    pub max_keyword: String,

    /// First matching major-keyword category, or empty.
    pub major_keyword: String,

    /// Row index in the node table.
    pub id: usize,
}

/// One coauthorship in the edge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    /// Display name of the first endpoint.
    pub author1: String,

    /// Display name of the second endpoint.
    pub author2: String,

    /// Shared publications.
    pub n_papers: usize,

    /// Summed known citations over the shared publications.
    pub n_citations: u64,

    /// Node ID of `author1`.
    pub id1: usize,

    /// Node ID of `author2`.
    pub id2: usize,
}

/// Node and edge tables for one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphTables {
    /// One row per author.
    pub nodes: Vec<NodeRow>,

    /// One row per unordered coauthor pair.
    pub edges: Vec<EdgeRow>,
}
