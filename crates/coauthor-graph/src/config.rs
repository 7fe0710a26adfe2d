//! Configuration for the remote sources and the graph builder.

use std::time::Duration;

use crate::error::ClientError;

/// Remote API constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for NCBI E-utilities.
    pub const EUTILS_API: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// Base URL for the arXiv Atom API.
    pub const ARXIV_API: &str = "https://export.arxiv.org/api";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay before each E-utilities request without an API key (3 req/s).
    pub const EUTILS_DELAY: Duration = Duration::from_millis(350);

    /// Delay before each E-utilities request with an API key (10 req/s).
    pub const EUTILS_DELAY_WITH_KEY: Duration = Duration::from_millis(110);

    /// Delay before each arXiv request (arXiv asks for one call every 3 seconds).
    pub const ARXIV_DELAY: Duration = Duration::from_secs(3);

    /// Retries of a transient failure (429, 5xx, timeout) per request.
    pub const MAX_RETRIES: u32 = 3;

    /// Shortest backoff before a retry, on top of the source delay.
    pub const RETRY_MIN_BACKOFF: Duration = Duration::from_secs(1);

    /// Longest backoff before a retry. Also caps an honored `Retry-After`.
    pub const RETRY_MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// Maximum PMIDs requested from ESearch.
    pub const ESEARCH_RETMAX: u32 = 1000;

    /// Maximum entries requested from the arXiv API.
    pub const ARXIV_MAX_RESULTS: u32 = 200;

    /// Cache TTL (30 minutes). Coauthors shared between seeds are fetched once.
    pub const CACHE_TTL: Duration = Duration::from_secs(1800);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 2000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Tool name reported to NCBI.
    pub const TOOL_NAME: &str = "coauthor-graph";
}

/// Major keyword categories, matched as substrings in this order.
pub const DEFAULT_MAJOR_KEYWORDS: &[&str] = &[
    "bioinformatics",
    "network",
    "cancer",
    "aging",
    "circadian",
    "omics",
    "neuro",
    "computer",
    "genetics",
    "microbiome",
    "computational",
    "cardio",
    "social",
    "epidemic",
    "sleep",
    "pharmacology",
    "mitochondria",
    "metabolism",
    "inflammation",
    "systems",
    "chrono",
    "diabetes",
    "immunology",
    "diet",
    "bacteria",
    "math",
    "physics",
    "graph",
    "complex",
    "machine learning",
    "artificial intelligence",
];

/// HTTP configuration for the record fetchers.
#[derive(Debug, Clone)]
pub struct Config {
    /// NCBI API key (optional, raises the E-utilities rate limit).
    pub ncbi_api_key: Option<String>,

    /// Contact email sent to NCBI with every request.
    pub contact_email: Option<String>,

    /// Base URL for E-utilities (for testing with mock servers).
    pub eutils_api_url: String,

    /// Base URL for the arXiv API (for testing with mock servers).
    pub arxiv_api_url: String,

    /// User-Agent header.
    pub user_agent: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay before each E-utilities request.
    pub eutils_delay: Duration,

    /// Delay before each arXiv request.
    pub arxiv_delay: Duration,

    /// Retries of a transient failure per request.
    pub max_retries: u32,

    /// Shortest backoff before a retry.
    pub retry_min_backoff: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,
}

impl Config {
    /// Create a new configuration with an optional NCBI API key.
    ///
    /// The E-utilities delay shrinks when a key is present.
    #[must_use]
    pub fn new(ncbi_api_key: Option<String>, contact_email: Option<String>) -> Self {
        let has_key = ncbi_api_key.is_some();
        Self {
            ncbi_api_key,
            contact_email,
            eutils_api_url: api::EUTILS_API.to_string(),
            arxiv_api_url: api::ARXIV_API.to_string(),
            user_agent: format!("{}/{}", api::TOOL_NAME, env!("CARGO_PKG_VERSION")),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            eutils_delay: if has_key { api::EUTILS_DELAY_WITH_KEY } else { api::EUTILS_DELAY },
            arxiv_delay: api::ARXIV_DELAY,
            max_retries: api::MAX_RETRIES,
            retry_min_backoff: api::RETRY_MIN_BACKOFF,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration pointing both sources at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            ncbi_api_key: None,
            contact_email: None,
            eutils_api_url: format!("{}/entrez/eutils", base_url),
            arxiv_api_url: format!("{}/api", base_url),
            user_agent: "coauthor-graph-tests".to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            eutils_delay: Duration::from_millis(0), // No delay in tests
            arxiv_delay: Duration::from_millis(0),
            max_retries: 0, // Failures surface immediately in tests
            retry_min_backoff: Duration::from_millis(0),
            cache_ttl: Duration::from_secs(0), // No caching in tests
            cache_max_size: 0,
        }
    }

    /// Create configuration from environment variables (and a `.env` file, if any).
    ///
    /// # Errors
    ///
    /// Returns error if a configured base URL is not a valid URL.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let api_key = std::env::var("NCBI_API_KEY").ok().filter(|k| !k.is_empty());
        let email = std::env::var("NCBI_EMAIL").ok().filter(|e| !e.is_empty());
        let mut config = Self::new(api_key, email);

        if let Ok(url) = std::env::var("EUTILS_API_URL") {
            config.eutils_api_url = url;
        }
        if let Ok(url) = std::env::var("ARXIV_API_URL") {
            config.arxiv_api_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the NCBI key and contact email, keeping values already set
    /// when an override is `None`.
    #[must_use]
    pub fn with_ncbi_credentials(mut self, api_key: Option<String>, email: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            self.ncbi_api_key = Some(key);
            self.eutils_delay = api::EUTILS_DELAY_WITH_KEY;
        }
        if let Some(email) = email.filter(|e| !e.is_empty()) {
            self.contact_email = Some(email);
        }
        self
    }

    /// Check that both base URLs parse.
    pub fn validate(&self) -> Result<(), ClientError> {
        for base in [&self.eutils_api_url, &self.arxiv_api_url] {
            url::Url::parse(base)
                .map_err(|e| ClientError::bad_request(format!("invalid base URL {base}: {e}")))?;
        }
        Ok(())
    }

    /// Check if an NCBI API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.ncbi_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Which sources a profile is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sources {
    /// PubMed only.
    Literature,
    /// arXiv only.
    Preprints,
    /// PubMed, then arXiv merged in.
    #[default]
    Both,
}

impl Sources {
    /// PubMed is queried.
    #[must_use]
    pub const fn literature(self) -> bool {
        matches!(self, Self::Literature | Self::Both)
    }

    /// arXiv is queried.
    #[must_use]
    pub const fn preprints(self) -> bool {
        matches!(self, Self::Preprints | Self::Both)
    }
}

/// Parameters for profile and graph construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Papers published before this year are ignored.
    pub start_year: i32,

    /// Middle-authorship papers allowed per year before a name is rejected.
    pub max_annual_papers: u32,

    /// Sources queried for every profile.
    pub sources: Sources,

    /// Coauthor generations explored beyond the seed.
    pub max_hops: usize,

    /// Major keyword categories in priority order (lowercase substrings).
    pub major_keywords: Vec<String>,
}

impl BuildOptions {
    /// Default start year.
    pub const DEFAULT_START_YEAR: i32 = 2000;

    /// Default anomaly threshold.
    pub const DEFAULT_MAX_ANNUAL_PAPERS: u32 = 30;
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            start_year: Self::DEFAULT_START_YEAR,
            max_annual_papers: Self::DEFAULT_MAX_ANNUAL_PAPERS,
            sources: Sources::Both,
            max_hops: 1,
            major_keywords: DEFAULT_MAJOR_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}
