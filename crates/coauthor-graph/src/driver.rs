//! Per-author runs and result files.
//!
//! Each author produces four artifacts in the result directory:
//!
//! | File | Content |
//! |------|---------|
//! | `{First}_{Last}_Papers.json` | seed [`AuthorProfile`] |
//! | `{First}_{Last}_ColabNet.json` | one-hop [`CollaborationGraph`] |
//! | `{First}_{Last}_OneDegreeNodes.csv` | node table |
//! | `{First}_{Last}_OneDegreeEdges.csv` | edge table |
//!
//! An artifact that already exists is reused unless overwriting is enabled,
//! so an interrupted batch can be resumed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{GraphError, GraphResult};
use crate::formatters::{format_edges_csv, format_nodes_csv};
use crate::identity::Identity;
use crate::models::{AuthorProfile, CollaborationGraph, GraphTables};
use crate::network::{BuildStats, CollaborationGraphBuilder, ProfileBuilder, ProfileOutcome, aggregate};

/// Default result directory.
pub const DEFAULT_RESULT_DIR: &str = "collaborationResults";

/// Author requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName {
    /// Given names, e.g. "Albert Laszlo".
    pub forename: String,
    /// Family name, e.g. "Barabasi".
    pub surname: String,
}

impl AuthorName {
    /// Create a name from its parts.
    #[must_use]
    pub fn new(forename: impl Into<String>, surname: impl Into<String>) -> Self {
        Self { forename: forename.into(), surname: surname.into() }
    }

    /// Normalized identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from_parts(&self.forename, &self.surname)
    }

    /// File name prefix: both parts with spaces removed, e.g. `AlbertLaszlo_Barabasi`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.forename.replace(' ', ""), self.surname.replace(' ', ""))
    }
}

impl fmt::Display for AuthorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.forename, self.surname)
    }
}

impl FromStr for AuthorName {
    type Err = String;

    /// Parse `"Forename|Surname"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (forename, surname) = s
            .split_once('|')
            .ok_or_else(|| format!("expected \"Forename|Surname\", got {s:?}"))?;
        let (forename, surname) = (forename.trim(), surname.trim());
        if forename.is_empty() || surname.is_empty() {
            return Err(format!("both forename and surname are required in {s:?}"));
        }
        Ok(Self::new(forename, surname))
    }
}

/// Paths of one author's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Seed profile.
    pub papers: PathBuf,
    /// Collaboration graph.
    pub network: PathBuf,
    /// Node table.
    pub nodes: PathBuf,
    /// Edge table.
    pub edges: PathBuf,
}

impl ArtifactPaths {
    /// Artifact paths for `author` inside `dir`.
    #[must_use]
    pub fn new(dir: &Path, author: &AuthorName) -> Self {
        let stem = author.file_stem();
        Self {
            papers: dir.join(format!("{stem}_Papers.json")),
            network: dir.join(format!("{stem}_ColabNet.json")),
            nodes: dir.join(format!("{stem}_OneDegreeNodes.csv")),
            edges: dir.join(format!("{stem}_OneDegreeEdges.csv")),
        }
    }
}

/// What a run produced for one author.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Normalized seed identity.
    pub seed: Identity,
    /// Where the artifacts live.
    pub paths: ArtifactPaths,
    /// Node and edge tables of the graph.
    pub tables: GraphTables,
    /// Coauthor counters, when the graph was rebuilt in this run.
    pub stats: Option<BuildStats>,
    /// Artifacts written (rather than reused) in this run.
    pub written: Vec<PathBuf>,
}

/// Runs the full pipeline for one author at a time.
#[derive(Debug)]
pub struct Driver {
    profiles: ProfileBuilder,
    result_dir: PathBuf,
    overwrite: bool,
}

impl Driver {
    /// Create a driver writing into `result_dir`.
    #[must_use]
    pub fn new(profiles: ProfileBuilder, result_dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self { profiles, result_dir: result_dir.into(), overwrite }
    }

    /// Directory the artifacts are written to.
    #[must_use]
    pub fn result_dir(&self) -> &Path {
        &self.result_dir
    }

    /// Build (or reuse) every artifact for `author`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::AnomalousSeed`] when the author's own profile
    /// trips the anomaly check, a client error when the seed fetch fails, and
    /// I/O or serialization errors from the result files.
    pub async fn run_author(&self, author: &AuthorName) -> GraphResult<RunSummary> {
        tokio::fs::create_dir_all(&self.result_dir).await?;

        let seed = author.identity();
        let paths = ArtifactPaths::new(&self.result_dir, author);
        let mut written = Vec::new();
        let mut stats = None;

        if self.needs_rebuild(&[paths.papers.as_path()]).await {
            let profile = match self.profiles.build(&seed).await? {
                ProfileOutcome::Profile(profile) => profile,
                ProfileOutcome::Anomaly { year, count } => {
                    return Err(GraphError::AnomalousSeed { identity: seed, year, count });
                }
            };
            write_json(&paths.papers, &profile).await?;
            written.push(paths.papers.clone());
        } else {
            tracing::info!(path = %paths.papers.display(), "Reusing existing profile");
        }

        if self.needs_rebuild(&[paths.network.as_path()]).await {
            let profile: AuthorProfile = read_json(&paths.papers).await?;
            let (graph, build_stats) = CollaborationGraphBuilder::new(&self.profiles)
                .build_with_stats(seed.clone(), profile)
                .await;
            write_json(&paths.network, &graph).await?;
            written.push(paths.network.clone());
            stats = Some(build_stats);
        } else {
            tracing::info!(path = %paths.network.display(), "Reusing existing network");
        }

        let graph: CollaborationGraph = read_json(&paths.network).await?;
        let tables = aggregate(&graph, &self.profiles.options().major_keywords);

        if self.needs_rebuild(&[paths.nodes.as_path(), paths.edges.as_path()]).await {
            tokio::fs::write(&paths.nodes, format_nodes_csv(&tables.nodes)).await?;
            tokio::fs::write(&paths.edges, format_edges_csv(&tables.edges)).await?;
            written.push(paths.nodes.clone());
            written.push(paths.edges.clone());
        }

        tracing::info!(
            author = %author,
            nodes = tables.nodes.len(),
            edges = tables.edges.len(),
            written = written.len(),
            "Author finished"
        );

        Ok(RunSummary { seed, paths, tables, stats, written })
    }

    async fn needs_rebuild(&self, paths: &[&Path]) -> bool {
        if self.overwrite {
            return true;
        }
        for path in paths {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return true;
            }
        }
        false
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> GraphResult<()> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    tokio::fs::write(path, body).await?;
    tracing::debug!(path = %path.display(), "Wrote result file");
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> GraphResult<T> {
    let body = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&body)?)
}
