//! State management module.
//!
//! Per-connection registration state, the shared read-only server info, and
//! the injected id generator.

mod info;
mod session;
mod uid;

pub use info::ServerInfo;
pub use session::SessionState;
pub use uid::{ClientId, IdGenerator};
