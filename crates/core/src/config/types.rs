use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::titlegen::TitleGenConfig;

use super::ConfigError;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub titlegen: TitleGenConfig,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port cannot be 0".to_string(),
            ));
        }
        if self.storage.link_extension.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.link_extension cannot be empty".to_string(),
            ));
        }
        self.titlegen
            .validate()
            .map_err(ConfigError::ValidationError)
    }
}

/// Host server addressing, used when building stream URLs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address of the host stream server. Wildcard addresses are
    /// never used as a stream host.
    #[serde(default)]
    pub host: Option<IpAddr>,
    /// Publicly reachable address clients should dial, when it differs
    /// from the bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            public_host: None,
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    8090
}

/// On-disk locations owned by this crate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database holding the durable title buckets.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Root directory for projected link trees.
    #[serde(default = "default_links_root")]
    pub links_root: PathBuf,
    /// Extension for link files.
    #[serde(default = "default_link_extension")]
    pub link_extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            links_root: default_links_root(),
            link_extension: default_link_extension(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("linklater.db")
}

fn default_links_root() -> PathBuf {
    PathBuf::from("streamlinks")
}

fn default_link_extension() -> String {
    "strmlnk".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8090);
        assert!(config.server.host.is_none());
        assert_eq!(config.storage.db_path.to_str().unwrap(), "linklater.db");
        assert_eq!(config.storage.links_root.to_str().unwrap(), "streamlinks");
        assert_eq!(config.storage.link_extension, "strmlnk");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "192.168.1.5"
public_host = "stream.example.org"
port = 9000

[storage]
db_path = "/data/linklater.db"
links_root = "/data/streamlinks"

[titlegen]
model = "gpt-4o-mini"
api_key = "sk-test"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.unwrap().to_string(), "192.168.1.5");
        assert_eq!(
            config.server.public_host.as_deref(),
            Some("stream.example.org")
        );
        assert_eq!(
            config.storage.db_path.to_str().unwrap(),
            "/data/linklater.db"
        );
        assert_eq!(config.titlegen.model, "gpt-4o-mini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: None,
                public_host: None,
                port: 0,
            },
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_link_extension_fails() {
        let config = Config {
            storage: StorageConfig {
                link_extension: String::new(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
