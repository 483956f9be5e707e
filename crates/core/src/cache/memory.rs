//! In-memory read-through cache layer.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::metrics;
use crate::torrent::TorrentId;

use super::store::{CacheError, TitleStore};

/// Read-through layer caching per-bucket title blobs in memory.
///
/// Only data blobs are cached here; bucket existence always comes from the
/// inner store, which keeps this layer coherent with drops performed below
/// it. Store and drop purge exactly the target bucket's cached entries
/// before delegating.
pub struct MemoryLayer {
    inner: Box<dyn TitleStore>,
    buckets: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl MemoryLayer {
    pub fn new(inner: Box<dyn TitleStore>) -> Self {
        Self {
            inner,
            buckets: RwLock::new(HashMap::new()),
        }
    }

    fn purge(&self, id: &TorrentId) {
        if let Ok(mut buckets) = self.buckets.write() {
            buckets.remove(id.as_str());
        }
    }

    #[cfg(test)]
    fn cached_bucket_len(&self, id: &TorrentId) -> usize {
        self.buckets
            .read()
            .map(|b| b.get(id.as_str()).map(HashMap::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl TitleStore for MemoryLayer {
    fn name(&self) -> &str {
        "memory"
    }

    fn has_bucket(&self, id: &TorrentId) -> bool {
        // Existence is authoritative only at the durable layer; answering
        // from the blob cache could contradict a completed drop.
        self.inner.has_bucket(id)
    }

    fn store_bucket(
        &self,
        id: &TorrentId,
        titles: &HashMap<String, String>,
    ) -> Result<(), CacheError> {
        self.purge(id);
        self.inner.store_bucket(id, titles)
    }

    fn lookup(&self, id: &TorrentId, path: &str) -> Option<String> {
        if let Ok(buckets) = self.buckets.read() {
            if let Some(title) = buckets.get(id.as_str()).and_then(|b| b.get(path)) {
                metrics::CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                return Some(title.clone());
            }
        }

        match self.inner.lookup(id, path) {
            Some(title) => {
                metrics::CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                if let Ok(mut buckets) = self.buckets.write() {
                    buckets
                        .entry(id.as_str().to_string())
                        .or_default()
                        .insert(path.to_string(), title.clone());
                }
                Some(title)
            }
            None => {
                metrics::CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
                None
            }
        }
    }

    fn drop_bucket(&self, id: &TorrentId) -> Result<(), CacheError> {
        self.purge(id);
        self.inner.drop_bucket(id)
    }
}
