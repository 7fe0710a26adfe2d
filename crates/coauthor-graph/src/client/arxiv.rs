//! arXiv records via the Atom query API.

use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use super::pubmed::collapse_whitespace;
use super::{HttpClient, RecordFetcher};
use crate::config::{Config, api};
use crate::error::ClientResult;
use crate::identity::Identity;
use crate::models::{PublicationId, RawAuthor, RawRecord, Source};

/// Trailing version suffix of an arXiv ID ("v2").
static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v\d+$").expect("valid version regex"));

/// Name suffixes that are never a surname.
const NAME_SUFFIXES: &[&str] = &["Jr", "Jr.", "Sr", "Sr.", "II", "III", "IV"];

/// arXiv record fetcher.
#[derive(Debug, Clone)]
pub struct ArxivFetcher {
    http: HttpClient,
    base_url: String,
}

impl ArxivFetcher {
    /// Create a fetcher from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: HttpClient::new(config, config.arxiv_delay)?,
            base_url: config.arxiv_api_url.clone(),
        })
    }

    /// Author query for an identity, e.g. `au:"Seth Rhoades"`.
    #[must_use]
    pub fn author_query(identity: &Identity) -> String {
        format!("au:\"{}\"", identity.display_name())
    }
}

#[async_trait::async_trait]
impl RecordFetcher for ArxivFetcher {
    fn source(&self) -> Source {
        Source::Arxiv
    }

    async fn fetch(&self, identity: &Identity) -> ClientResult<Vec<RawRecord>> {
        let url = format!("{}/query", self.base_url);
        let params = vec![
            ("search_query".to_string(), Self::author_query(identity)),
            ("start".to_string(), "0".to_string()),
            ("max_results".to_string(), api::ARXIV_MAX_RESULTS.to_string()),
            ("sortBy".to_string(), "submittedDate".to_string()),
            ("sortOrder".to_string(), "descending".to_string()),
        ];

        let xml = self.http.get_text(&url, &params).await?;
        let records = parse_atom_feed(&xml)?;
        tracing::debug!(%identity, hits = records.len(), "arXiv search");
        Ok(records)
    }
}

/// Split a display name ("Albert-László Barabási", "John A. Smith Jr.") into
/// forename and surname.
///
/// The surname is the last token that is not a generational suffix. Interior
/// initials ("A.", "B") are dropped from the forename; the leading token is
/// always kept.
#[must_use]
pub fn split_author_name(name: &str) -> RawAuthor {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| NAME_SUFFIXES.contains(t)) {
        tokens.pop();
    }

    match tokens.as_slice() {
        [] => RawAuthor::default(),
        [surname] => RawAuthor { surname: Some((*surname).to_string()), forename: None },
        [first, middle @ .., surname] => {
            let mut forename = vec![*first];
            forename.extend(middle.iter().filter(|t| !is_initial(t)));
            RawAuthor::new(forename.join(" "), *surname)
        }
    }
}

fn is_initial(token: &str) -> bool {
    let letters = token.strip_suffix('.').unwrap_or(token);
    letters.chars().count() == 1 && letters.chars().all(char::is_alphabetic)
}

/// Fields collected while inside one Atom `<entry>`.
#[derive(Default)]
struct EntryState {
    id: String,
    title: String,
    published: String,
    authors: Vec<String>,
    categories: Vec<String>,
    doi: String,
}

impl EntryState {
    fn on_element(&mut self, path: &[String], name: &str, e: &BytesStart<'_>) -> ClientResult<()> {
        match name {
            "author" => self.authors.push(String::new()),
            "category" if path.last().is_some_and(|p| p == "entry") => {
                if let Some(term) = e.try_get_attribute("term")? {
                    self.categories.push(term.unescape_value()?.into_owned());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, path: &[String], text: &str) {
        let Some(entry_at) = path.iter().rposition(|p| p == "entry") else {
            return;
        };

        match &path[entry_at + 1..] {
            [field] if field == "id" => self.id.push_str(text),
            [field] if field == "title" => self.title.push_str(text),
            [field] if field == "published" => self.published.push_str(text),
            [field] if field == "doi" => self.doi.push_str(text),
            [author, field] if author == "author" && field == "name" => {
                if let Some(name) = self.authors.last_mut() {
                    name.push_str(text);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<RawRecord> {
        // Error entries carry an api/errors URL instead of an abs/ link.
        let (_, number) = self.id.trim().split_once("/abs/")?;
        let number = VERSION_SUFFIX.replace(number, "");
        if number.is_empty() {
            return None;
        }

        let title = collapse_whitespace(&self.title);
        let published = self.published.trim();
        let doi = self.doi.trim();

        Some(RawRecord {
            id: PublicationId::arxiv(&number),
            title: (!title.is_empty()).then_some(title),
            year: (!published.is_empty()).then(|| published.to_string()),
            keywords: self.categories,
            authors: self
                .authors
                .iter()
                .map(|a| split_author_name(&collapse_whitespace(a)))
                .collect(),
            doi: (!doi.is_empty()).then(|| doi.to_string()),
        })
    }
}

/// Parse an arXiv Atom feed into raw records.
pub fn parse_atom_feed(xml: &str) -> ClientResult<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<EntryState> = None;
    let mut records = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if name == "entry" {
                    entry = Some(EntryState::default());
                } else if let Some(state) = entry.as_mut() {
                    state.on_element(&path, &name, &e)?;
                }
                path.push(name);
            }
            Event::Empty(e) => {
                if let Some(state) = entry.as_mut() {
                    state.on_element(&path, &local_name(&e), &e)?;
                }
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("entry") {
                    if let Some(record) = entry.take().and_then(EntryState::finish) {
                        records.push(record);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(state) = entry.as_mut() {
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
