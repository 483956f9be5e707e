//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external-collaborator
//! traits, allowing comprehensive testing without a torrent engine or a
//! text-generation provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use linklater_core::testing::{MockCompletionClient, MockEngine};
//!
//! let client = MockCompletionClient::always("Movie File (2020)");
//! let engine = MockEngine::new();
//! engine.add_torrent(&id, files);
//!
//! // Wire into TitleCoordinator / StreamLinkService...
//! ```

mod mock_completion;
mod mock_engine;

pub use mock_completion::MockCompletionClient;
pub use mock_engine::MockEngine;
