//! Torrent event entry point: classify, generate, project.

use std::sync::Arc;

use crate::cache::TitleStore;
use crate::classify::PathClassifier;
use crate::coordinator::TitleCoordinator;
use crate::links::LinkProjector;
use crate::torrent::{MediaFile, TorrentEngine, TorrentId};

/// Wires the host collaborators to the title cache and link projector.
///
/// The host calls [`refresh`](Self::refresh) whenever a torrent's file
/// listing becomes available (or may have changed). Nothing here fails the
/// caller: every error degrades to a skipped file or a literal-path title,
/// so playback is never blocked on generation or caching.
pub struct StreamLinkService {
    engine: Arc<dyn TorrentEngine>,
    classifier: Arc<dyn PathClassifier>,
    coordinator: TitleCoordinator,
    projector: LinkProjector,
    cache: Arc<dyn TitleStore>,
}

impl StreamLinkService {
    pub fn new(
        engine: Arc<dyn TorrentEngine>,
        classifier: Arc<dyn PathClassifier>,
        coordinator: TitleCoordinator,
        projector: LinkProjector,
        cache: Arc<dyn TitleStore>,
    ) -> Self {
        Self {
            engine,
            classifier,
            coordinator,
            projector,
            cache,
        }
    }

    /// Make sure every media file of the torrent has a cached title and a
    /// stream link on disk.
    pub async fn refresh(&self, id: &TorrentId) {
        let media_files = self.media_files(id);
        if media_files.is_empty() {
            tracing::debug!(torrent = %id, "no media files to link");
            return;
        }

        let paths: Vec<String> = media_files.iter().map(|f| f.path.clone()).collect();
        let title = self.engine.display_title(id).unwrap_or_default();
        let info_name = self.engine.info_name(id).unwrap_or_default();

        // Generation and projection share one lock scope so two refreshes
        // for the same torrent cannot interleave directory rebuilds.
        let _guard = self.coordinator.locks().acquire(id).await;
        self.coordinator.ensure_locked(id, &paths).await;
        if let Err(e) = self
            .projector
            .project(id, &title, &info_name, &media_files, self.cache.as_ref())
            .await
        {
            tracing::warn!(torrent = %id, "stream link projection failed: {}", e);
        }
    }

    fn media_files(&self, id: &TorrentId) -> Vec<MediaFile> {
        self.engine
            .file_stats(id)
            .into_iter()
            .filter(|file| {
                if file.path.is_empty() {
                    return false;
                }
                match self.classifier.classify(&file.path) {
                    Ok(kind) => kind.is_media(),
                    Err(e) => {
                        tracing::debug!("skipping unclassifiable file: {}", e);
                        false
                    }
                }
            })
            .collect()
    }
}
