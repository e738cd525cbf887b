//! # simbridge-proto
//!
//! Wire-level pieces of the simbridge IRC gateway:
//!
//! - [`LineCodec`]: CRLF framing over an accumulating byte buffer
//! - [`Message`]: command/parameter tokenizing with trailing-parameter rules
//! - [`Response`] and [`Reply`]: the reply vocabulary and its wire rendering
//!
//! ```rust
//! use simbridge_proto::Message;
//!
//! let msg = Message::parse("PRIVMSG #lobby :hello there").unwrap();
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params, vec!["#lobby", "hello there"]);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod reply;
pub mod response;

pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::{frame_len, LineCodec};
pub use self::message::Message;
pub use self::reply::Reply;
pub use self::response::Response;

/// Line terminator used on the wire.
pub const CRLF: &[u8] = b"\r\n";

/// Conventional read chunk size; one IRC line plus terminator slack.
pub const READ_CHUNK: usize = 520;
