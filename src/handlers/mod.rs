//! IRC command handlers.
//!
//! This module contains the Handler trait and command registry for dispatching
//! tokenized IRC lines to the handler for their verb.
//!
//! Three tiers share the table: implemented verbs, recognized-but-unimplemented
//! verbs (`421 ... :Command unimplemented`) and silently ignored verbs.
//! Everything else gets `421 ... :Unknown command`.

mod channel;
mod connection;
mod core;
mod messaging;
mod server_query;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::core::{Context, Handler, Registry};
pub use channel::send_join_announcement;
