//! Read-only server information shared by every connection.

use crate::config::Config;

/// Channel name bound to a region: `#` + region name with spaces as `-`.
pub fn channel_name(region_name: &str) -> String {
    format!("#{}", region_name.replace(' ', "-"))
}

/// Server identity and canned reply text.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    /// Bound channel (see [`channel_name`]).
    pub channel: String,
    pub topic: String,
    pub motd: Vec<String>,
}

impl ServerInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.server.name.clone(),
            channel: channel_name(&config.region.name),
            topic: config.region.topic.clone(),
            motd: config.region.motd.clone(),
        }
    }

    /// Info for tests without a config file.
    #[cfg(test)]
    pub fn new(name: &str, region_name: &str) -> Self {
        Self {
            name: name.to_string(),
            channel: channel_name(region_name),
            topic: "OpenSimulator IRC Server".to_string(),
            motd: vec!["- Hiya!".to_string()],
        }
    }
}
