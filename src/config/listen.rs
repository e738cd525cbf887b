//! IRC listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// IRC listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6667").
    pub address: SocketAddr,
    /// Unterminated bytes tolerated before the connection is dropped.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Initial read buffer size per connection.
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
}

fn default_max_line_len() -> usize {
    simbridge_proto::line::DEFAULT_MAX_LEN
}

fn default_read_chunk() -> usize {
    simbridge_proto::READ_CHUNK
}
