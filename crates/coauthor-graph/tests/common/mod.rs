//! Shared fixtures: in-memory record fetchers and record builders.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use coauthor_graph::client::RecordFetcher;
use coauthor_graph::config::BuildOptions;
use coauthor_graph::error::{ClientError, ClientResult};
use coauthor_graph::identity::Identity;
use coauthor_graph::models::{PublicationId, RawAuthor, RawRecord, Source};
use coauthor_graph::network::ProfileBuilder;

/// Fetcher answering from a fixed table keyed by identity.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    source: Option<Source>,
    records: HashMap<Identity, Vec<RawRecord>>,
    failing: HashSet<Identity>,
    calls: Mutex<Vec<Identity>>,
}

impl FakeFetcher {
    pub fn new(source: Source) -> Self {
        Self { source: Some(source), ..Self::default() }
    }

    pub fn with(mut self, key: &str, records: Vec<RawRecord>) -> Self {
        self.records.insert(Identity::parse(key), records);
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(Identity::parse(key));
        self
    }

    pub fn calls(&self) -> Vec<Identity> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordFetcher for FakeFetcher {
    fn source(&self) -> Source {
        self.source.unwrap_or(Source::PubMed)
    }

    async fn fetch(&self, identity: &Identity) -> ClientResult<Vec<RawRecord>> {
        self.calls.lock().unwrap().push(identity.clone());
        if self.failing.contains(identity) {
            return Err(ClientError::server(503, "unavailable"));
        }
        Ok(self.records.get(identity).cloned().unwrap_or_default())
    }
}

/// Split `"Surname, Forename"` fixtures into raw authors.
fn raw_authors(authors: &[&str]) -> Vec<RawAuthor> {
    authors
        .iter()
        .map(|a| {
            let (surname, forename) = a.split_once(", ").unwrap();
            RawAuthor::new(forename, surname)
        })
        .collect()
}

pub fn pubmed(pmid: &str, year: i32, authors: &[&str], keywords: &[&str]) -> RawRecord {
    RawRecord {
        id: PublicationId::pubmed(pmid),
        title: Some(format!("Paper {pmid}")),
        year: Some(year.to_string()),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        authors: raw_authors(authors),
        doi: None,
    }
}

pub fn preprint(number: &str, year: i32, authors: &[&str]) -> RawRecord {
    RawRecord {
        id: PublicationId::arxiv(number),
        title: Some(format!("Preprint {number}")),
        year: Some(format!("{year}-01-15T00:00:00Z")),
        keywords: vec!["cs.SI".to_string()],
        authors: raw_authors(authors),
        doi: None,
    }
}

/// `count` papers in `year` where `key` is a middle author.
pub fn middle_papers(key: &str, year: i32, count: usize, prefix: &str) -> Vec<RawRecord> {
    (0..count)
        .map(|i| pubmed(&format!("{prefix}{i}"), year, &["Lead, Lee", key, "Senior, Sam"], &[]))
        .collect()
}

pub fn builder(literature: FakeFetcher, preprints: FakeFetcher) -> ProfileBuilder {
    builder_with(Arc::new(literature), Arc::new(preprints), BuildOptions::default())
}

pub fn builder_with(
    literature: Arc<FakeFetcher>,
    preprints: Arc<FakeFetcher>,
    options: BuildOptions,
) -> ProfileBuilder {
    ProfileBuilder::new(literature, preprints, options)
}
