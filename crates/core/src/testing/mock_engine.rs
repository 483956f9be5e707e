//! Mock torrent engine with static listings.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::torrent::{MediaFile, TorrentEngine, TorrentId};

#[derive(Debug, Clone, Default)]
struct MockTorrent {
    files: Vec<MediaFile>,
    title: Option<String>,
    info_name: Option<String>,
}

/// In-memory torrent engine stub.
#[derive(Default)]
pub struct MockEngine {
    torrents: Mutex<HashMap<String, MockTorrent>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_torrent(&self, id: &TorrentId, files: Vec<MediaFile>) {
        let mut torrents = self.torrents.lock().unwrap_or_else(|e| e.into_inner());
        torrents.entry(id.as_str().to_string()).or_default().files = files;
    }

    pub fn set_display_title(&self, id: &TorrentId, title: impl Into<String>) {
        let mut torrents = self.torrents.lock().unwrap_or_else(|e| e.into_inner());
        torrents.entry(id.as_str().to_string()).or_default().title = Some(title.into());
    }

    pub fn set_info_name(&self, id: &TorrentId, name: impl Into<String>) {
        let mut torrents = self.torrents.lock().unwrap_or_else(|e| e.into_inner());
        torrents
            .entry(id.as_str().to_string())
            .or_default()
            .info_name = Some(name.into());
    }
}

impl TorrentEngine for MockEngine {
    fn file_stats(&self, id: &TorrentId) -> Vec<MediaFile> {
        self.torrents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id.as_str())
            .map(|t| t.files.clone())
            .unwrap_or_default()
    }

    fn display_title(&self, id: &TorrentId) -> Option<String> {
        self.torrents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id.as_str())
            .and_then(|t| t.title.clone())
    }

    fn info_name(&self, id: &TorrentId) -> Option<String> {
        self.torrents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id.as_str())
            .and_then(|t| t.info_name.clone())
    }
}
