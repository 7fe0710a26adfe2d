//! Publication records, raw and normalized.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identity::Identity;

/// Prefix carried by every arXiv publication ID.
pub const ARXIV_PREFIX: &str = "arXiv:";

/// Marker written for citation counts that were never looked up.
pub const UNAVAILABLE_MARKER: &str = "n/a";

/// Remote source a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// PubMed via NCBI E-utilities.
    PubMed,
    /// arXiv preprint server.
    Arxiv,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PubMed => f.write_str("pubmed"),
            Self::Arxiv => f.write_str("arxiv"),
        }
    }
}

/// Source-specific publication ID.
///
/// PubMed IDs are bare numbers, arXiv IDs carry the `arXiv:` prefix, so the
/// two ID spaces never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(String);

impl PublicationId {
    /// ID for a PubMed record.
    #[must_use]
    pub fn pubmed(pmid: impl Into<String>) -> Self {
        Self(pmid.into())
    }

    /// ID for an arXiv record (`number` without the prefix).
    #[must_use]
    pub fn arxiv(number: &str) -> Self {
        Self(format!("{ARXIV_PREFIX}{number}"))
    }

    /// Which source issued this ID.
    #[must_use]
    pub fn source(&self) -> Source {
        if self.0.starts_with(ARXIV_PREFIX) { Source::Arxiv } else { Source::PubMed }
    }

    /// The raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Citation count for one paper, or the explicit "not looked up" sentinel.
///
/// Serialized as a plain number or the string `"n/a"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Citations {
    /// Known citation count.
    Count(u64),
    /// Lookup skipped or failed.
    #[default]
    Unavailable,
}

impl Citations {
    /// The count, if one is known.
    #[must_use]
    pub const fn value(self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(n),
            Self::Unavailable => None,
        }
    }
}

impl From<Option<u64>> for Citations {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unavailable, Self::Count)
    }
}

impl Serialize for Citations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u64(*n),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Citations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Self::Count(n),
            Repr::Text(text) => text.trim().parse().map_or(Self::Unavailable, Self::Count),
        })
    }
}

/// Author entry as delivered by a fetcher, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAuthor {
    /// Family name.
    pub surname: Option<String>,
    /// Given name(s), possibly with initials.
    pub forename: Option<String>,
}

impl RawAuthor {
    /// Create an author from both name parts.
    #[must_use]
    pub fn new(forename: impl Into<String>, surname: impl Into<String>) -> Self {
        Self { surname: Some(surname.into()), forename: Some(forename.into()) }
    }

    /// Normalized identity, if both name parts are present.
    ///
    /// Group authors ("The XYZ Consortium") carry no forename and are dropped.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let surname = self.surname.as_deref().filter(|s| !s.trim().is_empty())?;
        let forename = self.forename.as_deref().filter(|s| !s.trim().is_empty())?;
        Some(Identity::from_parts(forename, surname))
    }
}

/// Publication record as delivered by a fetcher.
///
/// Any field may be missing; the profile builder drops records it cannot use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Source-specific ID.
    pub id: PublicationId,
    /// Article title.
    pub title: Option<String>,
    /// Publication year as printed by the source.
    pub year: Option<String>,
    /// Free-text keywords.
    pub keywords: Vec<String>,
    /// Author list in publication order.
    pub authors: Vec<RawAuthor>,
    /// DOI, when the source exposes one.
    pub doi: Option<String>,
}

impl RawRecord {
    /// Create an empty record with the given ID.
    #[must_use]
    pub fn new(id: PublicationId) -> Self {
        Self { id, title: None, year: None, keywords: Vec::new(), authors: Vec::new(), doi: None }
    }

    /// Parsed publication year.
    #[must_use]
    pub fn parsed_year(&self) -> Option<i32> {
        self.year.as_deref()?.trim().get(..4)?.parse().ok()
    }

    /// Normalized author list; authors lacking a name part are skipped.
    #[must_use]
    pub fn author_identities(&self) -> Vec<Identity> {
        self.authors.iter().filter_map(RawAuthor::identity).collect()
    }
}

/// A publication kept in an author profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Article title.
    pub title: String,

    /// Publication year.
    pub year: i32,

    /// Free-text keywords (may be empty).
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Complete author list in identity form.
    pub authors: Vec<Identity>,

    /// Citation count or "n/a".
    #[serde(default)]
    pub citations: Citations,
}
