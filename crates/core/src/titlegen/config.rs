//! Title generation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the title generation provider and worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleGenConfig {
    /// Model name/identifier at the provider.
    #[serde(default)]
    pub model: String,

    /// Bearer credential for the provider API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom API base URL (for proxies or self-hosted gateways).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,

    /// Maximum tokens per completion; titles are short.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Parallel generation workers per torrent batch.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_timeout() -> u32 {
    10
}

fn default_max_tokens() -> u32 {
    50
}

fn default_workers() -> usize {
    4
}

impl Default for TitleGenConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            api_key: None,
            api_base: None,
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            workers: default_workers(),
        }
    }
}

impl TitleGenConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("titlegen.timeout_secs cannot be 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("titlegen.max_tokens cannot be 0".to_string());
        }
        // model/api_key may stay unset: the client then reports
        // NotConfigured and every title degrades to its path.
        Ok(())
    }

    /// Effective worker-pool width; never below 1.
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}
