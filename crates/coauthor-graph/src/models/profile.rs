//! Per-author publication profile.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Publication, PublicationId};
use crate::identity::Identity;

/// Where an author sits in a paper's author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Only author.
    Sole,
    /// First of several authors.
    First,
    /// Last of several authors.
    Last,
    /// Anywhere else.
    Middle,
}

impl Position {
    /// Classify `owner` within `authors`, or `None` if not listed.
    #[must_use]
    pub fn classify(owner: &Identity, authors: &[Identity]) -> Option<Self> {
        if !authors.contains(owner) {
            return None;
        }

        let first = authors.first() == Some(owner);
        let last = authors.last() == Some(owner);

        Some(match (authors.len(), first, last) {
            (1, _, _) => Self::Sole,
            (_, true, _) => Self::First,
            (_, _, true) => Self::Last,
            _ => Self::Middle,
        })
    }
}

/// Aggregate publication record for one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    /// Papers as sole or first author.
    pub first_author: u32,

    /// Papers as sole or last author.
    pub last_author: u32,

    /// Coauthor identity to the papers shared with them.
    #[serde(default)]
    pub coauthors: BTreeMap<Identity, BTreeSet<PublicationId>>,

    /// Retained papers keyed by publication ID.
    #[serde(default)]
    pub papers: BTreeMap<PublicationId, Publication>,

    /// Middle-authorship events per year. Only used to flag name collisions.
    #[serde(default)]
    pub year_counter: BTreeMap<i32, u32>,
}

impl AuthorProfile {
    /// Create an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paper on behalf of `owner`.
    ///
    /// Returns `false` (and changes nothing) when the ID is already present or
    /// when `owner` is not among the paper's authors.
    pub fn insert_paper(
        &mut self,
        owner: &Identity,
        id: PublicationId,
        publication: Publication,
    ) -> bool {
        if self.papers.contains_key(&id) {
            return false;
        }

        let Some(position) = Position::classify(owner, &publication.authors) else {
            return false;
        };

        match position {
            Position::Sole => {
                self.first_author += 1;
                self.last_author += 1;
            }
            Position::First => self.first_author += 1,
            Position::Last => self.last_author += 1,
            Position::Middle => *self.year_counter.entry(publication.year).or_insert(0) += 1,
        }

        for coauthor in publication.authors.iter().filter(|a| *a != owner) {
            self.coauthors.entry(coauthor.clone()).or_default().insert(id.clone());
        }

        self.papers.insert(id, publication);
        true
    }

    /// Number of retained papers.
    #[must_use]
    pub fn total_papers(&self) -> usize {
        self.papers.len()
    }

    /// Number of single-author papers.
    #[must_use]
    pub fn sole_papers(&self) -> usize {
        self.papers.values().filter(|p| p.authors.len() == 1).count()
    }

    /// Total middle-authorship events across all years.
    #[must_use]
    pub fn ordinary_papers(&self) -> u32 {
        self.year_counter.values().sum()
    }

    /// First year whose middle-authorship count strictly exceeds `threshold`.
    #[must_use]
    pub fn anomalous_year(&self, threshold: u32) -> Option<(i32, u32)> {
        self.year_counter.iter().find(|&(_, &count)| count > threshold).map(|(&y, &c)| (y, c))
    }

    /// Summed citations over all papers, ignoring unavailable counts.
    #[must_use]
    pub fn citation_total(&self) -> u64 {
        self.papers.values().filter_map(|p| p.citations.value()).sum()
    }
}
