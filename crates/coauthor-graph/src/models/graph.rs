//! One-hop collaboration graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AuthorProfile;
use crate::identity::Identity;

/// Seed author plus the profiles of their direct coauthors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationGraph {
    /// Identity the graph was grown from.
    pub seed: Identity,

    /// Every successfully profiled identity, the seed included.
    pub profiles: BTreeMap<Identity, AuthorProfile>,
}

impl CollaborationGraph {
    /// Start a graph containing only the seed.
    #[must_use]
    pub fn new(seed: Identity, profile: AuthorProfile) -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(seed.clone(), profile);
        Self { seed, profiles }
    }

    /// Add (or replace) a profile.
    pub fn insert(&mut self, identity: Identity, profile: AuthorProfile) {
        self.profiles.insert(identity, profile);
    }

    /// Profile for an identity, if present.
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&AuthorProfile> {
        self.profiles.get(identity)
    }

    /// Whether the identity is a node of the graph.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.profiles.contains_key(identity)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Nodes in table order: the seed first, then the rest sorted by identity.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &AuthorProfile)> {
        let seed = self.profiles.get_key_value(&self.seed);
        let rest = self.profiles.iter().filter(move |(identity, _)| **identity != self.seed);
        seed.into_iter().chain(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_puts_seed_first() {
        let seed = Identity::parse("Zhou, Zoe");
        let mut graph = CollaborationGraph::new(seed.clone(), AuthorProfile::new());
        graph.insert(Identity::parse("Adams, Amy"), AuthorProfile::new());
        graph.insert(Identity::parse("Moreau, Marc"), AuthorProfile::new());

        let order: Vec<_> = graph.iter().map(|(id, _)| id.as_str().to_string()).collect();
        assert_eq!(order, vec!["Zhou, Zoe", "Adams, Amy", "Moreau, Marc"]);
        assert_eq!(graph.len(), 3);
        assert!(graph.contains(&seed));
    }
}
