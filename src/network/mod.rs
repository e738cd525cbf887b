//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-connection loop, and the
//! serialized reply writer shared by a connection's tasks.

mod connection;
mod gateway;

pub use connection::{Connection, ConnectionLimits, IrcClientView, ReplySink};
pub use gateway::Gateway;

#[cfg(test)]
pub(crate) use connection::testing;
