//! Title store trait and error type.

use std::collections::HashMap;

use thiserror::Error;

use crate::torrent::TorrentId;

/// Error type for title store operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store is not usable. Reads degrade to misses.
    #[error("title store unavailable")]
    Unavailable,

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

/// Bucketed title storage keyed by torrent identity.
///
/// A bucket holds every cached title for one torrent and is atomic at
/// bucket granularity: it is wholly present or wholly absent, and a reader
/// never observes an intermediate state.
pub trait TitleStore: Send + Sync {
    /// Name of this store/layer for logging.
    fn name(&self) -> &str;

    /// Whether a bucket exists for the torrent. Backend failures are logged
    /// and reported as `false`, never raised.
    fn has_bucket(&self, id: &TorrentId) -> bool;

    /// Write the full bucket in one logical operation. An empty bucket is
    /// rejected as a no-op; an existing bucket is left untouched (first
    /// writer wins).
    fn store_bucket(
        &self,
        id: &TorrentId,
        titles: &HashMap<String, String>,
    ) -> Result<(), CacheError>;

    /// Point read of one title. `None` is a cache miss, never an error.
    fn lookup(&self, id: &TorrentId, path: &str) -> Option<String>;

    /// Remove the bucket and invalidate every layer's cached view of it.
    fn drop_bucket(&self, id: &TorrentId) -> Result<(), CacheError>;
}
