//! Record fetchers for PubMed and arXiv.
//!
//! Both sources share one HTTP layer with:
//! - Connection pooling via reqwest
//! - A fixed delay before every attempt, retries included (per source, so per remote host)
//! - Retries of transient failures with exponential backoff, honoring `Retry-After`
//! - Response caching with a TTL

mod arxiv;
mod citations;
mod pubmed;

pub use arxiv::{ArxivFetcher, parse_atom_feed, split_author_name};
pub use citations::{CitationLookup, NoCitationLookup};
pub use pubmed::{PubMedFetcher, parse_efetch_xml};

use std::time::{Duration, SystemTime};

use moka::future::Cache;
use reqwest::Client;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{Jitter, RetryDecision, RetryPolicy};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::identity::Identity;
use crate::models::{RawRecord, Source};

/// A source of raw publication records for one author.
#[async_trait::async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Which source this fetcher queries.
    fn source(&self) -> Source;

    /// Fetch every record the source associates with `identity`.
    ///
    /// Malformed records are returned as-is (with missing fields); only a
    /// failure of the remote call itself is an error.
    async fn fetch(&self, identity: &Identity) -> ClientResult<Vec<RawRecord>>;
}

/// Rate-limited, cached HTTP client for one remote host.
#[derive(Clone)]
pub struct HttpClient {
    /// Pooled HTTP client.
    client: Client,

    /// Backoff between attempts of one request.
    retry_policy: ExponentialBackoff,

    /// Response cache (raw bodies).
    cache: Cache<String, String>,

    /// Delay before every attempt.
    delay: Duration,

    /// Per-request timeout, reported by [`ClientError::Timeout`].
    timeout: Duration,
}

impl HttpClient {
    /// Create a client that waits `delay` before each attempt.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config, delay: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let min_backoff = config.retry_min_backoff;
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(min_backoff, api::RETRY_MAX_BACKOFF.max(min_backoff))
            .jitter(Jitter::Bounded)
            .build_with_max_retries(config.max_retries);

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self { client, retry_policy, cache, delay, timeout: config.request_timeout })
    }

    /// GET a URL and return the response body as text.
    ///
    /// Transient failures (429, 5xx, timeouts) are retried. Every attempt,
    /// retries included, waits the source delay first.
    pub async fn get_text(&self, url: &str, params: &[(String, String)]) -> ClientResult<String> {
        // Check cache
        let cache_key = Self::cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return Ok(cached);
        }

        let started = SystemTime::now();
        let mut retries = 0;
        let body = loop {
            // Rate limit
            tokio::time::sleep(self.delay).await;

            tracing::debug!(url, attempt = retries + 1, "GET");
            let err = match self.attempt(url, params).await {
                Ok(body) => break body,
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            let Some(backoff) = self.backoff(started, retries) else {
                return Err(err);
            };
            let wait = err
                .retry_after()
                .map_or(backoff, |after| after.min(api::RETRY_MAX_BACKOFF).max(backoff));
            retries += 1;
            tracing::warn!(
                url,
                error = %err,
                retry = retries,
                wait_ms = wait.as_millis(),
                "Retrying request"
            );
            tokio::time::sleep(wait).await;
        };

        // Cache response
        self.cache.insert(cache_key, body.clone()).await;

        Ok(body)
    }

    /// Send one GET and read its body.
    async fn attempt(&self, url: &str, params: &[(String, String)]) -> ClientResult<String> {
        let response =
            self.client.get(url).query(params).send().await.map_err(|e| self.transport_error(e))?;
        let response = Self::handle_response(response).await?;
        response.text().await.map_err(|e| self.transport_error(e))
    }

    /// Wait before retry number `retries + 1`, or `None` when retries are exhausted.
    fn backoff(&self, started: SystemTime, retries: u32) -> Option<Duration> {
        match self.retry_policy.should_retry(started, retries) {
            RetryDecision::Retry { execute_after } => {
                Some(execute_after.duration_since(SystemTime::now()).unwrap_or_default())
            }
            RetryDecision::DoNotRetry => None,
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() { ClientError::Timeout(self.timeout) } else { ClientError::Http(err) }
    }

    /// GET a URL and decode a JSON body.
    pub async fn get_json<T>(&self, url: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.get_text(url, params).await?;
        serde_json::from_str(&body).map_err(ClientError::from)
    }

    /// Map response status codes to errors.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }

    /// Generate cache key.
    fn cache_key(method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("delay", &self.delay)
            .field("max_retries", &self.retry_policy.max_n_retries)
            .finish()
    }
}
