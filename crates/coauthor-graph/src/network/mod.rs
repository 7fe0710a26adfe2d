//! Collaboration network construction.
//!
//! - [`ProfileBuilder`] turns raw records into an [`AuthorProfile`](crate::models::AuthorProfile)
//! - [`CollaborationGraphBuilder`] grows a one-hop graph around a seed
//! - [`aggregate`] reduces the graph to node and edge tables

mod aggregate;
mod collab;
mod profile;

pub use aggregate::{aggregate, keyword_counts, major_keyword, max_keyword, node_row};
pub use collab::{BuildStats, CollaborationGraphBuilder};
pub use profile::{ProfileBuilder, ProfileOutcome};
