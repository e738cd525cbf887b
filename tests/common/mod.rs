//! Integration test common infrastructure.
//!
//! Provides utilities for spawning gateway processes, creating IRC clients
//! and issuing raw WebDAV requests.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::{TestClient, http_exchange};
#[allow(unused_imports)]
pub use server::TestServer;
