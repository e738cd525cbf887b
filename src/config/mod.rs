//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, RegionConfig)
//! - [`listen`]: IRC listener configuration (ListenConfig)
//! - [`webdav`]: WebDAV listener, users and served resources (WebDavConfig)
//! - [`bot`]: Region bot definitions (BotConfig)
//! - [`validation`]: Startup checks run after parsing

mod bot;
mod listen;
mod types;
mod validation;
mod webdav;

pub use bot::BotConfig;
pub use types::Config;
pub use validation::validate;
pub use webdav::{DavResourceConfig, DavUserConfig, WebDavConfig};
