//! Collaboration graph growth around a seed.

mod common;

use std::sync::Arc;

use coauthor_graph::config::BuildOptions;
use coauthor_graph::identity::Identity;
use coauthor_graph::models::{CollaborationGraph, Source};
use coauthor_graph::network::CollaborationGraphBuilder;
use common::{FakeFetcher, builder_with, middle_papers, pubmed};

const SEED: &str = "Rhoades, Seth";
const NORMAL: &str = "Able, Ann";
const ANOMALOUS: &str = "Wang, Wei";
const BROKEN: &str = "Baker, Bo";
const SECOND_HOP: &str = "Far, Fay";

fn literature() -> FakeFetcher {
    let mut wang = middle_papers(ANOMALOUS, 2018, 31, "w");
    wang.push(pubmed("100", 2020, &[SEED, ANOMALOUS], &[]));

    FakeFetcher::new(Source::PubMed)
        .with(
            SEED,
            vec![
                pubmed("100", 2020, &[SEED, ANOMALOUS], &[]),
                pubmed("101", 2021, &[SEED, NORMAL, BROKEN], &[]),
            ],
        )
        .with(
            NORMAL,
            vec![
                pubmed("101", 2021, &[SEED, NORMAL, BROKEN], &[]),
                pubmed("102", 2022, &[NORMAL, SECOND_HOP], &[]),
            ],
        )
        .with(ANOMALOUS, wang)
        .failing(BROKEN)
}

#[tokio::test]
async fn test_graph_skips_anomalous_and_failing_coauthors() {
    let literature = Arc::new(literature());
    let profiles = builder_with(
        literature.clone(),
        Arc::new(FakeFetcher::new(Source::Arxiv)),
        BuildOptions::default(),
    );

    let seed = Identity::parse(SEED);
    let seed_profile = profiles.build(&seed).await.unwrap().into_profile().unwrap();
    let (graph, stats) = CollaborationGraphBuilder::new(&profiles)
        .build_with_stats(seed.clone(), seed_profile)
        .await;

    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&seed));
    assert!(graph.contains(&Identity::parse(NORMAL)));
    assert!(!graph.contains(&Identity::parse(ANOMALOUS)));
    assert!(!graph.contains(&Identity::parse(BROKEN)));
    assert!(!graph.contains(&Identity::parse(SECOND_HOP)));

    assert_eq!(stats.added, 1);
    assert_eq!(stats.anomalies, 1);
    assert_eq!(stats.failures, 1);

    // Seed fetched once for its own profile; each coauthor once; nobody two hops out.
    let calls = literature.calls();
    assert_eq!(calls.len(), 4);
    assert!(!calls.contains(&Identity::parse(SECOND_HOP)));
}

#[tokio::test]
async fn test_zero_hops_keeps_only_seed() {
    let options = BuildOptions { max_hops: 0, ..BuildOptions::default() };
    let literature = Arc::new(literature());
    let profiles =
        builder_with(literature.clone(), Arc::new(FakeFetcher::new(Source::Arxiv)), options);

    let seed = Identity::parse(SEED);
    let seed_profile = profiles.build(&seed).await.unwrap().into_profile().unwrap();
    let graph = CollaborationGraphBuilder::new(&profiles).build(seed, seed_profile).await;

    assert_eq!(graph.len(), 1);
    assert_eq!(literature.calls().len(), 1);
}

#[tokio::test]
async fn test_two_hops_reaches_second_generation() {
    let options = BuildOptions { max_hops: 2, ..BuildOptions::default() };
    let literature = Arc::new(literature().with(SECOND_HOP, vec![pubmed("102", 2022, &[NORMAL, SECOND_HOP], &[])]));
    let profiles =
        builder_with(literature.clone(), Arc::new(FakeFetcher::new(Source::Arxiv)), options);

    let seed = Identity::parse(SEED);
    let seed_profile = profiles.build(&seed).await.unwrap().into_profile().unwrap();
    let graph = CollaborationGraphBuilder::new(&profiles).build(seed, seed_profile).await;

    assert!(graph.contains(&Identity::parse(SECOND_HOP)));
    assert_eq!(graph.len(), 3);
}

#[tokio::test]
async fn test_graph_survives_json_round_trip() {
    let profiles = builder_with(
        Arc::new(literature()),
        Arc::new(FakeFetcher::new(Source::Arxiv)),
        BuildOptions::default(),
    );
    let seed = Identity::parse(SEED);
    let seed_profile = profiles.build(&seed).await.unwrap().into_profile().unwrap();
    let graph = CollaborationGraphBuilder::new(&profiles).build(seed, seed_profile).await;

    let json = serde_json::to_string_pretty(&graph).unwrap();
    let restored: CollaborationGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(graph, restored);
}
