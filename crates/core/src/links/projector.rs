//! On-disk stream link projection.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tokio::fs;

use crate::cache::TitleStore;
use crate::config::ServerConfig;
use crate::metrics;
use crate::torrent::{MediaFile, TorrentId};

use super::sanitize::sanitize_name;
use super::url::{build_stream_url, stream_base_url};

/// Marker file holding the owning torrent's id inside a link directory.
pub const MARKER_FILE: &str = ".hash";

/// Errors that abort a whole projection. Per-file write failures are logged
/// and skipped instead.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to prepare links root {path}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create torrent link directory {path}")]
    DirCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mirrors one torrent's cached titles onto disk as stream link files.
pub struct LinkProjector {
    root: PathBuf,
    link_extension: String,
    server: ServerConfig,
}

impl LinkProjector {
    pub fn new(root: PathBuf, link_extension: impl Into<String>, server: ServerConfig) -> Self {
        Self {
            root,
            link_extension: link_extension.into(),
            server,
        }
    }

    /// Rebuild the link directory for `id` from scratch.
    ///
    /// Any previous directory owned by the torrent (identified by marker
    /// content, not by name) is removed first, so re-projecting after a
    /// title change replaces rather than duplicates. Re-running with
    /// identical inputs produces a byte-identical tree.
    pub async fn project(
        &self,
        id: &TorrentId,
        title: &str,
        info_name: &str,
        files: &[MediaFile],
        cache: &dyn TitleStore,
    ) -> Result<PathBuf, ProjectError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ProjectError::RootUnavailable {
                path: self.root.clone(),
                source: e,
            })?;

        self.remove_stale(id).await;

        let mut dir_name = sanitize_name(title);
        if dir_name.is_empty() {
            dir_name = sanitize_name(info_name);
        }
        if dir_name.is_empty() {
            dir_name = id.as_str().to_string();
        }

        let torrent_dir = self.root.join(&dir_name);
        fs::create_dir_all(&torrent_dir)
            .await
            .map_err(|e| ProjectError::DirCreationFailed {
                path: torrent_dir.clone(),
                source: e,
            })?;

        let base_url = stream_base_url(&self.server);

        let mut name_counts: HashMap<String, usize> = HashMap::new();
        for file in files {
            if file.path.is_empty() {
                continue;
            }

            let title = cache
                .lookup(id, &file.path)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| file.base_name().to_string());

            let mut base = sanitize_name(&title);
            if base.is_empty() {
                base = format!("file-{}", file.index);
            }

            let count = name_counts.entry(base.clone()).or_insert(0);
            *count += 1;
            let name = if *count > 1 {
                format!("{} ({})", base, *count)
            } else {
                base
            };

            let link = build_stream_url(&base_url, id, &file.path, file.index);
            let link_path = torrent_dir.join(format!("{}.{}", name, self.link_extension));
            match fs::write(&link_path, link.as_bytes()).await {
                Ok(()) => metrics::LINKS_WRITTEN.inc(),
                Err(e) => {
                    tracing::warn!("failed to write link file {}: {}", link_path.display(), e);
                }
            }
        }

        // The marker goes in last so a projection interrupted mid-write
        // never leaves a directory that looks complete.
        if let Err(e) = fs::write(torrent_dir.join(MARKER_FILE), id.as_str().as_bytes()).await {
            tracing::warn!(
                "failed to write hash marker in {}: {}",
                torrent_dir.display(),
                e
            );
        }

        Ok(torrent_dir)
    }

    /// Remove every directory under the root whose marker matches `id`.
    async fn remove_stale(&self, id: &TorrentId) {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(_) => return,
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let is_dir = match entry.file_type().await {
                Ok(file_type) => file_type.is_dir(),
                Err(_) => false,
            };
            if !is_dir {
                continue;
            }

            let path = entry.path();
            let marker = match fs::read_to_string(path.join(MARKER_FILE)).await {
                Ok(marker) => marker,
                Err(_) => continue,
            };
            if marker.trim().to_lowercase() == id.as_str() {
                if let Err(e) = fs::remove_dir_all(&path).await {
                    tracing::warn!("failed to remove stale link dir {}: {}", path.display(), e);
                }
            }
        }
    }
}
