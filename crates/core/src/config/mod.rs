//! Configuration loading and types.
//!
//! Configuration is loaded once and threaded explicitly into each component
//! at construction; nothing in the crate reads ambient global state.

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{Config, ServerConfig, StorageConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
