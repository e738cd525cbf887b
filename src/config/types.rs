//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::bot::BotConfig;
use super::listen::ListenConfig;
use super::webdav::WebDavConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,
    /// The region this gateway bridges into.
    pub region: RegionConfig,
    /// IRC listener.
    pub listen: ListenConfig,
    /// Optional WebDAV listener.
    pub webdav: Option<WebDavConfig>,
    /// Bots spawned into the region at startup.
    #[serde(default, rename = "bot")]
    pub bots: Vec<BotConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text and validate it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        if let Err(errors) = super::validate(&config) {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigError::Invalid(joined));
        }
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name shown in the MOTD banner.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "OpenSimulator".to_string()
}

/// Region binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// Region name; the bound channel is derived from it.
    pub name: String,
    /// Topic text sent in RPL_TOPIC.
    #[serde(default = "default_topic")]
    pub topic: String,
    /// Message of the day lines (RPL_MOTD).
    #[serde(default = "default_motd")]
    pub motd: Vec<String>,
    /// Presences that are always listed, in addition to attached clients.
    #[serde(default)]
    pub presences: Vec<String>,
}

fn default_topic() -> String {
    "OpenSimulator IRC Server".to_string()
}

fn default_motd() -> Vec<String> {
    vec!["- Hiya!".to_string()]
}
