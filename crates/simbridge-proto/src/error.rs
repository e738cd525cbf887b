//! Error types for the protocol crate.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing a byte stream.
///
/// Tokenizing never fails: degenerate input yields `None` from
/// [`Message::parse`](crate::Message::parse) instead of an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error on the underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Unterminated data grew past the configured limit.
    #[error("line too long: {actual} bytes buffered without terminator (limit {limit})")]
    LineTooLong {
        /// Bytes buffered when the limit tripped.
        actual: usize,
        /// Configured maximum.
        limit: usize,
    },
}

impl ProtocolError {
    /// Whether the peer closed or broke the transport, as opposed to a
    /// protocol violation.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
