//! Collaboration graph growth from a seed profile.

use std::collections::{BTreeSet, VecDeque};

use super::{ProfileBuilder, ProfileOutcome};
use crate::identity::Identity;
use crate::models::{AuthorProfile, CollaborationGraph};

/// Grows a collaboration graph around a seed author.
///
/// Coauthors are profiled one at a time from a work queue. Every identity is
/// fetched at most once, and nothing beyond `max_hops` generations from the
/// seed is enqueued.
#[derive(Debug)]
pub struct CollaborationGraphBuilder<'a> {
    profiles: &'a ProfileBuilder,
    max_hops: usize,
}

/// Counters reported after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Coauthors profiled successfully.
    pub added: usize,
    /// Coauthors rejected as name collisions.
    pub anomalies: usize,
    /// Coauthors whose fetch failed.
    pub failures: usize,
}

impl<'a> CollaborationGraphBuilder<'a> {
    /// Create a builder using the profile builder's own hop limit.
    #[must_use]
    pub fn new(profiles: &'a ProfileBuilder) -> Self {
        Self { profiles, max_hops: profiles.options().max_hops }
    }

    /// Build the graph, discarding the counters.
    pub async fn build(&self, seed: Identity, seed_profile: AuthorProfile) -> CollaborationGraph {
        self.build_with_stats(seed, seed_profile).await.0
    }

    /// Build the graph and report how many coauthors were kept or dropped.
    ///
    /// A coauthor whose profile is anomalous or whose fetch fails is left out;
    /// the rest of the build continues.
    pub async fn build_with_stats(
        &self,
        seed: Identity,
        seed_profile: AuthorProfile,
    ) -> (CollaborationGraph, BuildStats) {
        let mut stats = BuildStats::default();
        let mut visited = BTreeSet::from([seed.clone()]);
        let mut queue = VecDeque::new();

        if self.max_hops > 0 {
            enqueue_coauthors(&seed_profile, 1, &mut visited, &mut queue);
        }
        let mut graph = CollaborationGraph::new(seed, seed_profile);

        while let Some((identity, hop)) = queue.pop_front() {
            tracing::info!(%identity, hop, remaining = queue.len(), "Profiling coauthor");

            match self.profiles.build(&identity).await {
                Ok(ProfileOutcome::Profile(profile)) => {
                    if hop < self.max_hops {
                        enqueue_coauthors(&profile, hop + 1, &mut visited, &mut queue);
                    }
                    graph.insert(identity, profile);
                    stats.added += 1;
                }
                Ok(ProfileOutcome::Anomaly { .. }) => stats.anomalies += 1,
                Err(err) => {
                    tracing::warn!(%identity, error = %err, "Skipping coauthor after fetch failure");
                    stats.failures += 1;
                }
            }
        }

        tracing::info!(
            seed = %graph.seed,
            nodes = graph.len(),
            added = stats.added,
            anomalies = stats.anomalies,
            failures = stats.failures,
            "Collaboration graph built"
        );
        (graph, stats)
    }
}

fn enqueue_coauthors(
    profile: &AuthorProfile,
    hop: usize,
    visited: &mut BTreeSet<Identity>,
    queue: &mut VecDeque<(Identity, usize)>,
) {
    for coauthor in profile.coauthors.keys() {
        let identity = Identity::parse(coauthor.as_str());
        if identity.is_complete() && visited.insert(identity.clone()) {
            queue.push_back((identity, hop));
        }
    }
}
