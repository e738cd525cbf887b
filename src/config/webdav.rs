//! WebDAV listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// WebDAV listener, accounts and the resources served by the built-in backend.
#[derive(Debug, Clone, Deserialize)]
pub struct WebDavConfig {
    /// Address to bind to (e.g., "0.0.0.0:8080").
    pub address: SocketAddr,
    /// Path prefix LOCK and PROPFIND are mounted under.
    #[serde(default = "default_mount")]
    pub path: String,
    /// Basic auth realm.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Accounts allowed to use the share.
    #[serde(default)]
    pub users: Vec<DavUserConfig>,
    /// Resources known to the in-memory backend.
    #[serde(default)]
    pub resources: Vec<DavResourceConfig>,
}

/// One WebDAV account.
#[derive(Debug, Clone, Deserialize)]
pub struct DavUserConfig {
    pub name: String,
    pub password: String,
}

/// One resource served by the in-memory backend.
#[derive(Debug, Clone, Deserialize)]
pub struct DavResourceConfig {
    /// Absolute path; collections conventionally end with `/`.
    pub path: String,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub length: u64,
}

fn default_mount() -> String {
    "/".to_string()
}

fn default_realm() -> String {
    "simbridge".to_string()
}
