//! Node and edge tables for a finished collaboration graph.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::identity::Identity;
use crate::models::{AuthorProfile, CollaborationGraph, EdgeRow, GraphTables, NodeRow};

/// Keyword text some sources use for "no keywords".
const EMPTY_LIST_MARKER: &str = "[]";

/// Reduce a graph to its node and edge tables.
///
/// Nodes come out seed first, then by identity; node IDs are row indices.
#[must_use]
pub fn aggregate(graph: &CollaborationGraph, major_keywords: &[String]) -> GraphTables {
    let nodes: Vec<NodeRow> = graph
        .iter()
        .enumerate()
        .map(|(id, (identity, profile))| node_row(identity, profile, major_keywords, id))
        .collect();

    let ids: HashMap<&Identity, usize> =
        graph.iter().enumerate().map(|(id, (identity, _))| (identity, id)).collect();

    let edges = edge_rows(graph, &ids);
    GraphTables { nodes, edges }
}

/// Summarize one author.
#[must_use]
pub fn node_row(
    identity: &Identity,
    profile: &AuthorProfile,
    major_keywords: &[String],
    id: usize,
) -> NodeRow {
    let counts = keyword_counts(profile);

    NodeRow {
        author: identity.display_name(),
        total_papers: profile.total_papers(),
        first_authors: profile.first_author,
        last_authors: profile.last_author,
        citations: profile.citation_total(),
        max_keyword: max_keyword(&counts).unwrap_or_default().to_string(),
        major_keyword: major_keyword(&counts, major_keywords).unwrap_or_default().to_string(),
        id,
    }
}

/// Lower-cased keyword frequencies over all of a profile's papers.
#[must_use]
pub fn keyword_counts(profile: &AuthorProfile) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for keyword in profile.papers.values().flat_map(|p| &p.keywords) {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() || keyword == EMPTY_LIST_MARKER {
            continue;
        }
        *counts.entry(keyword).or_insert(0) += 1;
    }

    counts
}

/// Most frequent keyword; ties go to the alphabetically first one.
#[must_use]
pub fn max_keyword(counts: &BTreeMap<String, usize>) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (keyword, &count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((keyword.as_str(), count));
        }
    }
    best.map(|(keyword, _)| keyword)
}

/// Category of the first vocabulary word (in sorted order) containing any
/// category; within that word, categories are tried in list order.
#[must_use]
pub fn major_keyword<'a>(
    counts: &BTreeMap<String, usize>,
    major_keywords: &'a [String],
) -> Option<&'a str> {
    counts.keys().find_map(|word| {
        major_keywords
            .iter()
            .find(|category| !category.is_empty() && word.contains(category.as_str()))
            .map(String::as_str)
    })
}

fn edge_rows(graph: &CollaborationGraph, ids: &HashMap<&Identity, usize>) -> Vec<EdgeRow> {
    let mut seen: HashSet<(&Identity, &Identity)> = HashSet::new();
    let mut edges = Vec::new();

    for (author1, profile) in graph.iter() {
        for (author2, shared) in &profile.coauthors {
            let Some(&id2) = ids.get(author2) else {
                continue;
            };
            if author1 == author2 {
                continue;
            }

            let pair = if author1 < author2 { (author1, author2) } else { (author2, author1) };
            if !seen.insert(pair) {
                continue;
            }

            let n_citations = shared
                .iter()
                .filter_map(|id| profile.papers.get(id))
                .filter_map(|paper| paper.citations.value())
                .sum();

            edges.push(EdgeRow {
                author1: author1.display_name(),
                author2: author2.display_name(),
                n_papers: shared.len(),
                n_citations,
                id1: ids[author1],
                id2,
            });
        }
    }

    tracing::debug!(edges = edges.len(), "Edge table built");
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Citations, Publication, PublicationId};

    fn profile_with_keywords(keyword_lists: &[&[&str]]) -> AuthorProfile {
        let owner = Identity::parse("Owner, Olive");
        let mut profile = AuthorProfile::new();
        for (i, keywords) in keyword_lists.iter().enumerate() {
            profile.insert_paper(
                &owner,
                PublicationId::pubmed(i.to_string()),
                Publication {
                    title: format!("Paper {i}"),
                    year: 2020,
                    keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
                    authors: vec![owner.clone()],
                    citations: Citations::Unavailable,
                },
            );
        }
        profile
    }

    fn categories(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_keyword_counts_lowercase_and_drop_markers() {
        let profile = profile_with_keywords(&[&["Cancer", "cancer", "[]"], &["  "]]);
        let counts = keyword_counts(&profile);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["cancer"], 2);
    }

    #[test]
    fn test_max_keyword_tie_is_alphabetical() {
        let profile = profile_with_keywords(&[&["zebrafish", "aging"]]);
        assert_eq!(max_keyword(&keyword_counts(&profile)), Some("aging"));
    }

    #[test]
    fn test_max_keyword_prefers_frequency() {
        let profile = profile_with_keywords(&[&["zebrafish", "aging"], &["zebrafish"]]);
        assert_eq!(max_keyword(&keyword_counts(&profile)), Some("zebrafish"));
    }

    #[test]
    fn test_major_keyword_first_matching_word() {
        let profile = profile_with_keywords(&[&["cancer biology", "diet"]]);
        let cats = categories(&["cancer", "genetics"]);
        assert_eq!(major_keyword(&keyword_counts(&profile), &cats), Some("cancer"));
    }

    #[test]
    fn test_major_keyword_multiword_category() {
        let profile = profile_with_keywords(&[&["deep machine learning"]]);
        let cats = categories(&["machine learning"]);
        assert_eq!(major_keyword(&keyword_counts(&profile), &cats), Some("machine learning"));
    }

    #[test]
    fn test_major_keyword_none() {
        let profile = profile_with_keywords(&[&["zebrafish"]]);
        let cats = categories(&["cancer", ""]);
        assert_eq!(major_keyword(&keyword_counts(&profile), &cats), None);
    }

    #[test]
    fn test_empty_vocabulary_node() {
        let identity = Identity::parse("Owner, Olive");
        let profile = profile_with_keywords(&[&[]]);
        let row = node_row(&identity, &profile, &categories(&["cancer"]), 3);
        assert_eq!(row.max_keyword, "");
        assert_eq!(row.major_keyword, "");
        assert_eq!(row.author, "Olive Owner");
        assert_eq!(row.id, 3);
        assert_eq!(row.total_papers, 1);
    }
}
