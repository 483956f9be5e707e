//! Prefix router over multiple durable stores.

use std::collections::HashMap;

use crate::torrent::TorrentId;

use super::store::{CacheError, TitleStore};

/// Routes each bucket to one of several inner stores by torrent-id prefix.
///
/// Routes are consulted in insertion order; the first matching prefix wins
/// and unmatched ids go to the fallback store. Every operation for a given
/// id lands on the same store, so bucket atomicity is preserved per store.
pub struct RouterLayer {
    routes: Vec<(String, Box<dyn TitleStore>)>,
    fallback: Box<dyn TitleStore>,
}

impl RouterLayer {
    pub fn new(fallback: Box<dyn TitleStore>) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Add a prefix route. Earlier routes take precedence.
    pub fn with_route(mut self, prefix: impl Into<String>, store: Box<dyn TitleStore>) -> Self {
        self.routes.push((prefix.into(), store));
        self
    }

    fn select(&self, id: &TorrentId) -> &dyn TitleStore {
        self.routes
            .iter()
            .find(|(prefix, _)| id.as_str().starts_with(prefix.as_str()))
            .map(|(_, store)| store.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

impl TitleStore for RouterLayer {
    fn name(&self) -> &str {
        "router"
    }

    fn has_bucket(&self, id: &TorrentId) -> bool {
        self.select(id).has_bucket(id)
    }

    fn store_bucket(
        &self,
        id: &TorrentId,
        titles: &HashMap<String, String>,
    ) -> Result<(), CacheError> {
        self.select(id).store_bucket(id, titles)
    }

    fn lookup(&self, id: &TorrentId, path: &str) -> Option<String> {
        self.select(id).lookup(id, path)
    }

    fn drop_bucket(&self, id: &TorrentId) -> Result<(), CacheError> {
        self.select(id).drop_bucket(id)
    }
}
