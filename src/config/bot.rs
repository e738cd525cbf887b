//! Region bot configuration.

use serde::Deserialize;

/// One bot spawned into the region at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_first_name")]
    pub first_name: String,
    /// Generated from the id sequence when absent.
    pub last_name: Option<String>,
    /// Start position `[x, y, z]`.
    #[serde(default = "default_start")]
    pub start: [f32; 3],
    /// Whether the bot obeys `!` chat commands.
    #[serde(default = "default_true")]
    pub admin: bool,
}

fn default_first_name() -> String {
    "Default".to_string()
}

fn default_start() -> [f32; 3] {
    [128.0, 128.0, 128.0]
}

fn default_true() -> bool {
    true
}
