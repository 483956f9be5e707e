//! Per-torrent generation coordination.
//!
//! One generation round per torrent at a time: a registry of per-torrent
//! mutexes serializes rounds for the same id while different torrents run
//! fully concurrently. Within a round, provider calls fan out over a
//! bounded worker pool whose width is scoped to that round (no process-wide
//! cap).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tokio::sync::OwnedMutexGuard;

use crate::cache::TitleStore;
use crate::metrics;
use crate::titlegen::TitleGenerator;
use crate::torrent::TorrentId;

struct LockSlot {
    mutex: Arc<tokio::sync::Mutex<()>>,
    holders: usize,
}

type SlotMap = Arc<Mutex<HashMap<String, LockSlot>>>;

/// Registry of per-torrent mutexes.
///
/// Slots are created on demand and reference counted; the entry is removed
/// when the last guard drops, so the registry never grows with the number
/// of torrents seen over the process lifetime.
#[derive(Clone, Default)]
pub struct TorrentLocks {
    slots: SlotMap,
}

/// RAII guard for one torrent's lock. Dropping it releases the lock and
/// reclaims the registry entry once no other holder remains.
pub struct TorrentLockGuard {
    key: String,
    slots: SlotMap,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for TorrentLockGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.holders -= 1;
            if slot.holders == 0 {
                slots.remove(&self.key);
            }
        }
    }
}

impl TorrentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `id`, waiting behind any current holder.
    pub async fn acquire(&self, id: &TorrentId) -> TorrentLockGuard {
        let mutex = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            let slot = slots
                .entry(id.as_str().to_string())
                .or_insert_with(|| LockSlot {
                    mutex: Arc::new(tokio::sync::Mutex::new(())),
                    holders: 0,
                });
            slot.holders += 1;
            Arc::clone(&slot.mutex)
        };

        let guard = mutex.lock_owned().await;
        TorrentLockGuard {
            key: id.as_str().to_string(),
            slots: Arc::clone(&self.slots),
            _guard: guard,
        }
    }

    /// Number of live lock entries, for registry-reclaim assertions.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Orchestrates title generation for a torrent's media paths.
pub struct TitleCoordinator {
    generator: Arc<TitleGenerator>,
    cache: Arc<dyn TitleStore>,
    locks: TorrentLocks,
    workers: usize,
}

impl TitleCoordinator {
    /// `workers` bounds the parallel provider calls per round; a value of 0
    /// is treated as 1.
    pub fn new(generator: Arc<TitleGenerator>, cache: Arc<dyn TitleStore>, workers: usize) -> Self {
        Self {
            generator,
            cache,
            locks: TorrentLocks::new(),
            workers: workers.max(1),
        }
    }

    /// The per-torrent lock registry, shared with callers that need to hold
    /// the lock across more than the generation round itself.
    pub fn locks(&self) -> &TorrentLocks {
        &self.locks
    }

    /// Make sure a title bucket exists for `id`, generating titles for
    /// every path that needs one. Serialized per torrent; a second call is
    /// a no-op once the bucket exists.
    pub async fn ensure(&self, id: &TorrentId, paths: &[String]) {
        let _guard = self.locks.acquire(id).await;
        self.ensure_locked(id, paths).await;
    }

    /// [`ensure`](Self::ensure) without taking the torrent lock; the caller
    /// must already hold it via [`locks`](Self::locks).
    pub async fn ensure_locked(&self, id: &TorrentId, paths: &[String]) {
        let unique = dedup_paths(paths);
        if unique.is_empty() {
            return;
        }

        if self.cache.has_bucket(id) {
            tracing::debug!(torrent = %id, "title bucket already exists");
            return;
        }

        let generator = &self.generator;
        let titles: HashMap<String, String> = stream::iter(unique)
            .map(|path| async move {
                let title = match generator.generate(&path).await {
                    Ok(title) => {
                        metrics::TITLE_GENERATIONS
                            .with_label_values(&["generated"])
                            .inc();
                        title
                    }
                    Err(e) => {
                        metrics::TITLE_GENERATIONS
                            .with_label_values(&["degraded"])
                            .inc();
                        tracing::warn!(path = %path, "title degraded to path: {}", e);
                        path.clone()
                    }
                };
                (path, title)
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        if titles.is_empty() {
            return;
        }

        // Generation ran outside the durable store's own locking; another
        // writer may have stored the bucket meanwhile.
        if self.cache.has_bucket(id) {
            tracing::debug!(torrent = %id, "bucket appeared during generation, skipping store");
            return;
        }

        match self.cache.store_bucket(id, &titles) {
            Ok(()) => {
                metrics::BUCKETS_STORED.inc();
                tracing::debug!(torrent = %id, titles = titles.len(), "stored title bucket");
            }
            Err(e) => {
                tracing::warn!(torrent = %id, "failed to store title bucket: {}", e);
            }
        }
    }
}

fn dedup_paths(paths: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(paths.len());
    paths
        .iter()
        .filter(|p| !p.is_empty() && seen.insert(p.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SqliteTitleStore;
    use crate::testing::MockCompletionClient;

    fn torrent(id: &str) -> TorrentId {
        TorrentId::new(id).unwrap()
    }

    fn coordinator(client: Arc<MockCompletionClient>) -> TitleCoordinator {
        TitleCoordinator::new(
            Arc::new(TitleGenerator::new(client)),
            Arc::new(SqliteTitleStore::in_memory().unwrap()),
            4,
        )
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedup_preserves_order_and_drops_empties() {
        let input = paths(&["b.mkv", "", "a.mkv", "b.mkv"]);
        assert_eq!(dedup_paths(&input), paths(&["b.mkv", "a.mkv"]));
    }

    #[tokio::test]
    async fn test_ensure_stores_bucket() {
        let client = Arc::new(MockCompletionClient::always("Movie (2020)"));
        let coordinator = coordinator(client.clone());
        let id = torrent("abc123");

        coordinator.ensure(&id, &paths(&["a.mkv", "b.mkv"])).await;

        let cache = Arc::clone(&coordinator.cache);
        assert!(cache.has_bucket(&id));
        assert_eq!(cache.lookup(&id, "a.mkv").as_deref(), Some("Movie (2020)"));
        assert_eq!(cache.lookup(&id, "b.mkv").as_deref(), Some("Movie (2020)"));
        // Stable mock agrees on the second vote: 2 calls per path.
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test]
    async fn test_second_ensure_is_noop() {
        let client = Arc::new(MockCompletionClient::always("Movie (2020)"));
        let coordinator = coordinator(client.clone());
        let id = torrent("abc123");

        coordinator.ensure(&id, &paths(&["a.mkv"])).await;
        let calls_after_first = client.calls();

        coordinator.ensure(&id, &paths(&["a.mkv"])).await;
        assert_eq!(client.calls(), calls_after_first);
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_to_path() {
        // Script: first path's three calls disagree, every later call fails.
        let client = Arc::new(MockCompletionClient::with_script(vec![
            Ok("A".to_string()),
            Ok("B".to_string()),
            Ok("C".to_string()),
        ]));
        let coordinator = TitleCoordinator::new(
            Arc::new(TitleGenerator::new(client)),
            Arc::new(SqliteTitleStore::in_memory().unwrap()),
            1,
        );
        let id = torrent("abc123");

        coordinator
            .ensure(&id, &paths(&["dir/movie.mkv", "dir/other.mkv"]))
            .await;

        let cache = Arc::clone(&coordinator.cache);
        assert!(cache.has_bucket(&id));
        assert_eq!(
            cache.lookup(&id, "dir/movie.mkv").as_deref(),
            Some("dir/movie.mkv")
        );
        assert_eq!(
            cache.lookup(&id, "dir/other.mkv").as_deref(),
            Some("dir/other.mkv")
        );
    }

    #[tokio::test]
    async fn test_empty_paths_is_noop() {
        let client = Arc::new(MockCompletionClient::always("Movie (2020)"));
        let coordinator = coordinator(client.clone());
        let id = torrent("abc123");

        coordinator.ensure(&id, &[]).await;
        coordinator.ensure(&id, &paths(&["", ""])).await;

        assert!(!coordinator.cache.has_bucket(&id));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_racing_ensures_generate_once() {
        let client = Arc::new(MockCompletionClient::always("Movie (2020)"));
        let coordinator = Arc::new(coordinator(client.clone()));
        let id = torrent("abc123");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                coordinator
                    .ensure(&id, &paths(&["a.mkv", "b.mkv"]))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Exactly one batch ran: 2 paths x 2 agreeing votes.
        assert_eq!(client.calls(), 4);
        assert!(coordinator.cache.has_bucket(&id));
    }

    #[tokio::test]
    async fn test_lock_registry_is_reclaimed() {
        let client = Arc::new(MockCompletionClient::always("Movie (2020)"));
        let coordinator = coordinator(client);
        let id = torrent("abc123");

        coordinator.ensure(&id, &paths(&["a.mkv"])).await;
        assert!(coordinator.locks().is_empty());
    }

    #[tokio::test]
    async fn test_locks_serialize_same_torrent_only() {
        let locks = TorrentLocks::new();
        let a = torrent("aaa111");
        let b = torrent("bbb222");

        let guard_a = locks.acquire(&a).await;
        // Different torrent is not blocked.
        let guard_b = locks.acquire(&b).await;
        assert_eq!(locks.len(), 2);

        drop(guard_a);
        drop(guard_b);
        assert!(locks.is_empty());
    }
}
