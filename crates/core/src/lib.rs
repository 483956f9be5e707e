//! linklater-core - per-torrent media title cache and stream link projection.
//!
//! Embedded in a torrent-streaming server, this crate reacts to "this
//! torrent has files" events: it classifies the listing, asks an external
//! text-generation provider for player-friendly titles (guarded by a
//! consistency vote), caches the result durably per torrent, and mirrors it
//! onto disk as small stream-redirect files that DLNA/Infuse-style clients
//! can browse.
//!
//! # Architecture
//!
//! ```text
//! TorrentEngine (host) ──file listing──▶ StreamLinkService
//!                                            │ classify (PathClassifier)
//!                                            ▼
//!                                   TitleCoordinator ──▶ TitleGenerator ──▶ provider
//!                                            │ bucket per torrent
//!                                            ▼
//!                          TitleStore chain: memory ▸ router ▸ sqlite
//!                                            │
//!                                            ▼
//!                                     LinkProjector ──▶ <links root>/<title>/*.strmlnk
//! ```

pub mod cache;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod links;
pub mod metrics;
pub mod service;
pub mod testing;
pub mod titlegen;
pub mod torrent;

pub use cache::{
    layered_store, CacheError, MemoryLayer, RouterLayer, SqliteTitleStore, TitleStore,
};
pub use classify::{ClassifyError, ExtensionClassifier, MediaKind, PathClassifier};
pub use config::{load_config, load_config_from_str, Config, ConfigError, ServerConfig, StorageConfig};
pub use coordinator::{TitleCoordinator, TorrentLockGuard, TorrentLocks};
pub use links::{sanitize_name, LinkProjector, ProjectError, MARKER_FILE};
pub use service::StreamLinkService;
pub use titlegen::{
    CompletionClient, GenerateError, OpenAiClient, ProviderError, TitleGenConfig, TitleGenerator,
};
pub use torrent::{MediaFile, TorrentEngine, TorrentId};
