//! Media classification of torrent file paths.
//!
//! Classification decides which torrent files deserve a generated title and
//! a stream link. The host may plug in its own [`PathClassifier`]; the
//! default [`ExtensionClassifier`] guesses from the file extension.

use thiserror::Error;

/// Errors that can occur during path classification.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// No recognizable media type for the path. Non-fatal; the file is
    /// skipped.
    #[error("no recognizable media type for {path}")]
    Unknown { path: String },
}

/// Coarse media classification of a torrent file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Other,
}

impl MediaKind {
    /// Whether files of this kind get titles and stream links.
    pub fn is_media(&self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Audio)
    }
}

/// Trait for classifying torrent file paths.
pub trait PathClassifier: Send + Sync {
    /// Name of this classifier for logging.
    fn name(&self) -> &str;

    /// Classify a slash-normalized relative path.
    fn classify(&self, path: &str) -> Result<MediaKind, ClassifyError>;
}

/// Extension-based classifier backed by `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionClassifier;

impl ExtensionClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl PathClassifier for ExtensionClassifier {
    fn name(&self) -> &str {
        "extension"
    }

    fn classify(&self, path: &str) -> Result<MediaKind, ClassifyError> {
        let mime = mime_guess::from_path(path)
            .first()
            .ok_or_else(|| ClassifyError::Unknown {
                path: path.to_string(),
            })?;

        Ok(match mime.type_().as_str() {
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Other,
        })
    }
}
