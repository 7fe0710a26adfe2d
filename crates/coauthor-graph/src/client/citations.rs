//! Optional citation counts.
//!
//! Citation lookups go through scraped third-party pages that block
//! automated clients quickly, so no live implementation ships. The trait
//! lets a caller plug one in; anything it fails to answer is stored as
//! unavailable.

use crate::error::ClientResult;
use crate::models::RawRecord;

/// Best-effort citation counter for one record.
#[async_trait::async_trait]
pub trait CitationLookup: Send + Sync {
    /// Citation count for `record`, `None` if unknown.
    async fn citations(&self, record: &RawRecord) -> ClientResult<Option<u64>>;
}

/// Lookup that never answers; every paper ends up "n/a".
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCitationLookup;

#[async_trait::async_trait]
impl CitationLookup for NoCitationLookup {
    async fn citations(&self, _record: &RawRecord) -> ClientResult<Option<u64>> {
        Ok(None)
    }
}
