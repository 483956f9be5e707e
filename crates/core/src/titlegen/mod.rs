//! Title generation - normalized media titles from a text-generation provider.
//!
//! Media file names inside torrents are rarely player-friendly
//! (`Movie.File.2020.1080p.WEB-DL.x264.mkv`). This module turns them into
//! titles DLNA/Infuse-style clients can display, using an external
//! text-generation service behind the [`CompletionClient`] trait.
//!
//! Provider output is nondeterministic, so [`TitleGenerator`] applies a
//! triple-call consistency vote: a title is accepted only once two calls
//! agree on it, and unstable output fails the generation instead of storing
//! a coin-flip result.

mod client;
mod config;
mod generator;

pub use client::{CompletionClient, OpenAiClient, ProviderError};
pub use config::TitleGenConfig;
pub use generator::{GenerateError, TitleGenerator};
