//! Torrent title cache - durable, layered, bucketed by torrent identity.
//!
//! The cache maps `(torrent id, file path)` to a display title. All titles
//! for one torrent form a *bucket* that exists or does not exist as a whole;
//! no operation can observe a partially written bucket.
//!
//! Storage is a chain of layers, each implementing [`TitleStore`] and
//! delegating to an inner store it owns:
//!
//! ```text
//! MemoryLayer (read-through blob cache)
//!   └── RouterLayer (prefix-routed durable stores)
//!         └── SqliteTitleStore (one row per path, keyed by bucket)
//! ```
//!
//! Every mutating or existence-checking call walks the full chain, so a
//! cached view can never contradict the durable layer: after `drop_bucket`
//! returns, `has_bucket` is false at every layer; after `store_bucket`
//! returns, `lookup` serves the stored titles at every layer.

mod memory;
mod router;
mod sqlite;
mod store;

use std::path::Path;
use std::sync::Arc;

pub use memory::MemoryLayer;
pub use router::RouterLayer;
pub use sqlite::SqliteTitleStore;
pub use store::{CacheError, TitleStore};

/// Build the default three-layer chain over a SQLite database at `db_path`.
pub fn layered_store(db_path: &Path) -> Result<Arc<dyn TitleStore>, CacheError> {
    let durable = SqliteTitleStore::new(db_path)?;
    let routed = RouterLayer::new(Box::new(durable));
    let memory = MemoryLayer::new(Box::new(routed));
    Ok(Arc::new(memory))
}
