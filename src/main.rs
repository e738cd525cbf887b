//! simbridge - region gateway
//!
//! Bridges IRC clients into a region's public chat, serves WebDAV
//! LOCK/PROPFIND for the region's resources and runs scripted bots.

mod bot;
mod config;
mod dav;
mod error;
mod handlers;
mod http;
mod network;
mod region;
mod state;

use crate::bot::Bot;
use crate::config::Config;
use crate::dav::DavRouter;
use crate::network::{ConnectionLimits, Gateway};
use crate::region::{LocalRegion, Presence, Region};
use crate::state::{IdGenerator, ServerInfo};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        region = %config.region.name,
        "Starting simbridge"
    );

    let presences = config
        .region
        .presences
        .iter()
        .map(Presence::new)
        .collect();
    let region: Arc<dyn Region> = Arc::new(LocalRegion::new(&config.region.name, presences));
    let info = Arc::new(ServerInfo::from_config(&config));
    let ids = Arc::new(IdGenerator::new());

    if let Some(webdav) = &config.webdav {
        let router = Arc::new(DavRouter::from_config(webdav));
        tokio::spawn(http::run_dav_server(webdav.address, router));
    }

    for bot in &config.bots {
        Bot::spawn(bot, &ids, Arc::clone(&region));
    }
    info!(count = config.bots.len(), "Bots spawned");

    let limits = ConnectionLimits {
        max_line_len: config.listen.max_line_len,
        read_chunk: config.listen.read_chunk,
    };
    let gateway = Gateway::bind(config.listen.address, region, info, ids, limits).await?;

    gateway.run().await?;

    Ok(())
}
