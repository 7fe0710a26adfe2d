//! Coauthorship collaboration networks from PubMed and arXiv.
//!
//! Given an author's name, the crate fetches their publications, builds a
//! profile (authorship positions, coauthors, papers), grows a one-hop
//! collaboration graph by profiling every coauthor, and reduces the graph
//! to node and edge tables.
//!
//! # Pipeline
//!
//! - [`client`]: record fetchers for PubMed E-utilities and the arXiv API
//! - [`network::ProfileBuilder`]: profiles, preprint merging, anomaly check
//! - [`network::CollaborationGraphBuilder`]: one-hop graph growth
//! - [`network::aggregate`]: node and edge tables
//! - [`driver`]: per-author runs and result files
//!
//! # Example
//!
//! ```no_run
//! use coauthor_graph::{
//!     config::{BuildOptions, Config},
//!     driver::{AuthorName, Driver},
//!     network::ProfileBuilder,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let profiles = ProfileBuilder::from_config(&config, BuildOptions::default())?;
//!     let driver = Driver::new(profiles, "collaborationResults", false);
//!
//!     let summary = driver.run_author(&AuthorName::new("Seth", "Rhoades")).await?;
//!     println!("{} nodes", summary.tables.nodes.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod formatters;
pub mod identity;
pub mod models;
pub mod network;

pub use config::{BuildOptions, Config};
pub use error::{ClientError, GraphError};
pub use identity::Identity;
