//! Torrent-facing types and the host engine interface.
//!
//! The torrent engine itself (piece selection, peer wire protocol, download
//! state) lives in the host process; this crate only consumes a file listing
//! and display metadata through the [`TorrentEngine`] trait.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized torrent identity: a trimmed, lower-cased hex content digest.
///
/// Construction fails for a digest that is empty after trimming, so an
/// invalid id is never representable and downstream code does not re-check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TorrentId(String);

impl TorrentId {
    /// Normalize `raw` (trim + lower-case) into an id.
    ///
    /// Returns `None` when the digest is empty after trimming.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TorrentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One file inside a torrent, as reported by the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Slash-normalized path relative to the torrent root.
    pub path: String,
    /// Index of the file in the torrent's file table.
    pub index: u32,
    /// Size in bytes.
    pub size: u64,
}

impl MediaFile {
    pub fn new(path: impl Into<String>, index: u32, size: u64) -> Self {
        Self {
            path: path.into(),
            index,
            size,
        }
    }

    /// Final path component, used as the fallback display title.
    pub fn base_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// File listing and display metadata owned by the host torrent engine.
pub trait TorrentEngine: Send + Sync {
    /// Ordered file listing for the torrent; empty when the torrent is
    /// unknown or has no metadata yet.
    fn file_stats(&self, id: &TorrentId) -> Vec<MediaFile>;

    /// User-facing torrent title, if one has been set.
    fn display_title(&self, id: &TorrentId) -> Option<String>;

    /// Name from the torrent's info dictionary.
    fn info_name(&self, id: &TorrentId) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torrent_id_normalizes() {
        let id = TorrentId::new("  ABC123Def  ").unwrap();
        assert_eq!(id.as_str(), "abc123def");
        assert_eq!(id.to_string(), "abc123def");
    }

    #[test]
    fn test_torrent_id_rejects_empty() {
        assert!(TorrentId::new("").is_none());
        assert!(TorrentId::new("   ").is_none());
    }

    #[test]
    fn test_media_file_base_name() {
        let file = MediaFile::new("Season 1/Episode.01.mkv", 3, 1024);
        assert_eq!(file.base_name(), "Episode.01.mkv");

        let flat = MediaFile::new("movie.mkv", 0, 2048);
        assert_eq!(flat.base_name(), "movie.mkv");
    }
}
