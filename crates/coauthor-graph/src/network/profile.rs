//! Author profile construction and preprint merging.

use std::fmt;
use std::sync::Arc;

use crate::client::{ArxivFetcher, CitationLookup, NoCitationLookup, PubMedFetcher, RecordFetcher};
use crate::config::{BuildOptions, Config};
use crate::error::ClientResult;
use crate::identity::Identity;
use crate::models::{AuthorProfile, Citations, Publication, RawRecord, Source};

/// Result of profiling one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// A trustworthy profile.
    Profile(AuthorProfile),

    /// The name collects too many middle-author papers in some year and
    /// probably belongs to several people.
    Anomaly {
        /// First offending year.
        year: i32,
        /// Middle-authorship papers in that year.
        count: u32,
    },
}

impl ProfileOutcome {
    /// The profile, or `None` for an anomaly.
    #[must_use]
    pub fn into_profile(self) -> Option<AuthorProfile> {
        match self {
            Self::Profile(profile) => Some(profile),
            Self::Anomaly { .. } => None,
        }
    }

    /// Whether this is the anomaly signal.
    #[must_use]
    pub const fn is_anomaly(&self) -> bool {
        matches!(self, Self::Anomaly { .. })
    }
}

/// Why a raw record did not make it into a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    NotAnAuthor,
    MissingYear,
    BeforeStartYear,
    MissingTitle,
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAnAuthor => "author not listed",
            Self::MissingYear => "no parseable year",
            Self::BeforeStartYear => "before start year",
            Self::MissingTitle => "no title",
        })
    }
}

/// Builds author profiles from the configured record sources.
pub struct ProfileBuilder {
    literature: Arc<dyn RecordFetcher>,
    preprints: Arc<dyn RecordFetcher>,
    citations: Arc<dyn CitationLookup>,
    options: BuildOptions,
}

impl ProfileBuilder {
    /// Create a builder over explicit fetchers.
    #[must_use]
    pub fn new(
        literature: Arc<dyn RecordFetcher>,
        preprints: Arc<dyn RecordFetcher>,
        options: BuildOptions,
    ) -> Self {
        Self { literature, preprints, citations: Arc::new(NoCitationLookup), options }
    }

    /// Create a builder over the live PubMed and arXiv APIs.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be initialized.
    pub fn from_config(config: &Config, options: BuildOptions) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(PubMedFetcher::new(config)?),
            Arc::new(ArxivFetcher::new(config)?),
            options,
        ))
    }

    /// Use a citation lookup for literature records.
    #[must_use]
    pub fn with_citation_lookup(mut self, lookup: Arc<dyn CitationLookup>) -> Self {
        self.citations = lookup;
        self
    }

    /// Options every profile is built with.
    #[must_use]
    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Fetch and profile one identity.
    ///
    /// Literature records are processed first, then preprints are merged in.
    /// The anomaly check runs once on the combined profile.
    pub async fn build(&self, identity: &Identity) -> ClientResult<ProfileOutcome> {
        let sources = self.options.sources;
        let mut profile = None;

        if sources.literature() {
            let records = self.literature.fetch(identity).await?;
            profile = Some(self.profile_from_records(identity, &records).await);
        }

        if sources.preprints() {
            let records = self.preprints.fetch(identity).await?;
            profile = Some(self.merge_preprints(profile, identity, &records).await);
        }

        let profile = profile.unwrap_or_default();
        let threshold = self.options.max_annual_papers;

        if let Some((year, count)) = profile.anomalous_year(threshold) {
            tracing::warn!(
                %identity,
                year,
                count,
                threshold,
                "Maximum annual number of papers exceeded, discarding profile"
            );
            return Ok(ProfileOutcome::Anomaly { year, count });
        }

        tracing::info!(
            %identity,
            papers = profile.total_papers(),
            coauthors = profile.coauthors.len(),
            "Built profile"
        );
        Ok(ProfileOutcome::Profile(profile))
    }

    /// Build a profile from literature records alone.
    pub async fn profile_from_records(
        &self,
        identity: &Identity,
        records: &[RawRecord],
    ) -> AuthorProfile {
        let mut profile = AuthorProfile::new();
        for record in records {
            self.absorb(&mut profile, identity, record).await;
        }
        profile
    }

    /// Fold preprint records into an existing profile (or a fresh one).
    ///
    /// Papers already present keep their stored fields; a preprint whose ID
    /// is already in the profile is ignored.
    pub async fn merge_preprints(
        &self,
        existing: Option<AuthorProfile>,
        identity: &Identity,
        records: &[RawRecord],
    ) -> AuthorProfile {
        let mut profile = existing.unwrap_or_default();
        for record in records {
            self.absorb(&mut profile, identity, record).await;
        }
        profile
    }

    async fn absorb(&self, profile: &mut AuthorProfile, identity: &Identity, record: &RawRecord) {
        match self.publication_for(identity, record).await {
            Ok(publication) => {
                if !profile.insert_paper(identity, record.id.clone(), publication) {
                    tracing::debug!(id = %record.id, "Duplicate publication ignored");
                }
            }
            Err(reason) => tracing::debug!(id = %record.id, %reason, "Skipping record"),
        }
    }

    async fn publication_for(&self, identity: &Identity, record: &RawRecord) -> Result<Publication, Skip> {
        let authors = record.author_identities();
        if !authors.contains(identity) {
            return Err(Skip::NotAnAuthor);
        }

        let year = record.parsed_year().ok_or(Skip::MissingYear)?;
        if year < self.options.start_year {
            return Err(Skip::BeforeStartYear);
        }

        let title = record.title.clone().ok_or(Skip::MissingTitle)?;
        let citations = self.citations_for(record).await;

        Ok(Publication { title, year, keywords: record.keywords.clone(), authors, citations })
    }

    async fn citations_for(&self, record: &RawRecord) -> Citations {
        if record.id.source() != Source::PubMed {
            return Citations::Unavailable;
        }

        match self.citations.citations(record).await {
            Ok(count) => count.into(),
            Err(err) => {
                tracing::debug!(id = %record.id, error = %err, "Citation lookup failed");
                Citations::Unavailable
            }
        }
    }
}

impl fmt::Debug for ProfileBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileBuilder")
            .field("literature", &self.literature.source())
            .field("preprints", &self.preprints.source())
            .field("options", &self.options)
            .finish()
    }
}
