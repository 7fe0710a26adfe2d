//! PubMed records via NCBI E-utilities (ESearch + EFetch).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Deserialize;

use super::{HttpClient, RecordFetcher};
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::identity::Identity;
use crate::models::{PublicationId, RawAuthor, RawRecord, Source};

/// PMIDs per EFetch request; larger batches overflow URL length limits.
const EFETCH_BATCH: usize = 200;

/// PubMed record fetcher.
#[derive(Debug, Clone)]
pub struct PubMedFetcher {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,

    #[serde(default, rename = "ERROR")]
    error: Option<String>,
}

impl PubMedFetcher {
    /// Create a fetcher from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, config.eutils_delay)?,
            base_url: config.eutils_api_url.clone(),
            api_key: config.ncbi_api_key.clone(),
            email: config.contact_email.clone(),
        })
    }

    /// Search term used for an identity, e.g. `Rhoades, Seth[Author]`.
    #[must_use]
    pub fn author_term(identity: &Identity) -> String {
        format!("{identity}[Author]")
    }

    /// Run ESearch and return matching PMIDs, most relevant first.
    pub async fn search_ids(&self, term: &str) -> ClientResult<Vec<String>> {
        let url = format!("{}/esearch.fcgi", self.base_url);

        let mut params = self.common_params();
        params.extend([
            ("term".to_string(), term.to_string()),
            ("retmode".to_string(), "json".to_string()),
            ("retmax".to_string(), api::ESEARCH_RETMAX.to_string()),
            ("sort".to_string(), "relevance".to_string()),
        ]);

        let response: ESearchResponse = self.http.get_json(&url, &params).await?;
        if let Some(error) = response.esearchresult.error {
            return Err(ClientError::bad_request(error));
        }

        Ok(response.esearchresult.idlist)
    }

    /// Run EFetch for the given PMIDs and parse the article XML.
    pub async fn fetch_details(&self, ids: &[String]) -> ClientResult<Vec<RawRecord>> {
        let url = format!("{}/efetch.fcgi", self.base_url);
        let mut records = Vec::with_capacity(ids.len());

        for batch in ids.chunks(EFETCH_BATCH) {
            let mut params = self.common_params();
            params.extend([
                ("retmode".to_string(), "xml".to_string()),
                ("id".to_string(), batch.join(",")),
            ]);

            let xml = self.http.get_text(&url, &params).await?;
            records.extend(parse_efetch_xml(&xml)?);
        }

        Ok(records)
    }

    fn common_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("tool".to_string(), api::TOOL_NAME.to_string()),
        ];
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }
}

#[async_trait::async_trait]
impl RecordFetcher for PubMedFetcher {
    fn source(&self) -> Source {
        Source::PubMed
    }

    async fn fetch(&self, identity: &Identity) -> ClientResult<Vec<RawRecord>> {
        let ids = self.search_ids(&Self::author_term(identity)).await?;
        tracing::debug!(%identity, hits = ids.len(), "PubMed search");

        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_details(&ids).await
    }
}

/// Fields collected while inside one `<PubmedArticle>`.
#[derive(Default)]
struct ArticleState {
    pmid: Option<String>,
    title: String,
    year: Option<String>,
    keywords: Vec<String>,
    authors: Vec<RawAuthor>,
    doi: Option<String>,
    doi_pending: bool,
}

impl ArticleState {
    fn on_start(&mut self, path: &[String], name: &str, e: &BytesStart<'_>) -> ClientResult<()> {
        match name {
            "Author" if parent_is(path, "AuthorList") => self.authors.push(RawAuthor::default()),
            "Keyword" if parent_is(path, "KeywordList") => self.keywords.push(String::new()),
            "ArticleId" if parent_is(path, "ArticleIdList") => {
                let id_type = e.try_get_attribute("IdType")?;
                self.doi_pending = match id_type {
                    Some(attr) => attr.unescape_value()? == "doi",
                    None => false,
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, path: &[String], text: &str) {
        if ends_with(path, &["MedlineCitation", "PMID"]) {
            if self.pmid.is_none() {
                self.pmid = Some(text.trim().to_string());
            }
        } else if path.iter().any(|p| p == "ArticleTitle") {
            self.title.push_str(text);
        } else if ends_with(path, &["JournalIssue", "PubDate", "Year"]) {
            self.year = Some(text.trim().to_string());
        } else if ends_with(path, &["AuthorList", "Author", "LastName"]) {
            if let Some(author) = self.authors.last_mut() {
                author.surname = Some(text.trim().to_string());
            }
        } else if ends_with(path, &["AuthorList", "Author", "ForeName"]) {
            if let Some(author) = self.authors.last_mut() {
                author.forename = Some(text.trim().to_string());
            }
        } else if path.windows(2).any(|w| w[0] == "KeywordList" && w[1] == "Keyword") {
            if let Some(keyword) = self.keywords.last_mut() {
                keyword.push_str(text);
            }
        } else if ends_with(path, &["ArticleIdList", "ArticleId"]) && self.doi_pending {
            self.doi = Some(text.trim().to_string());
            self.doi_pending = false;
        }
    }

    fn finish(self) -> Option<RawRecord> {
        let pmid = self.pmid.filter(|p| !p.is_empty())?;
        let title = collapse_whitespace(&self.title);

        Some(RawRecord {
            id: PublicationId::pubmed(pmid),
            title: (!title.is_empty()).then_some(title),
            year: self.year,
            keywords: self
                .keywords
                .iter()
                .map(|k| collapse_whitespace(k))
                .filter(|k| !k.is_empty())
                .collect(),
            authors: self.authors,
            doi: self.doi,
        })
    }
}

/// Parse an EFetch `PubmedArticleSet` document.
///
/// Articles without a PMID are dropped; every other field is optional.
pub fn parse_efetch_xml(xml: &str) -> ClientResult<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut article: Option<ArticleState> = None;
    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if name == "PubmedArticle" {
                    article = Some(ArticleState::default());
                } else if let Some(state) = article.as_mut() {
                    state.on_start(&path, &name, &e)?;
                }
                path.push(name);
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("PubmedArticle") {
                    if let Some(record) = article.take().and_then(ArticleState::finish) {
                        records.push(record);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(state) = article.as_mut() {
                    let text = t.unescape()?;
                    state.on_text(&path, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn parent_is(path: &[String], parent: &str) -> bool {
    path.last().is_some_and(|p| p == parent)
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..].iter().zip(suffix).all(|(a, b)| a == b)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
