//! Classification of read-side failures.

use simbridge_proto::ProtocolError;

/// What the connection loop does after a framing error.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ReadErrorAction {
    /// Peer sent more unterminated data than allowed - log and disconnect
    LineTooLong { actual: usize, limit: usize },
    /// I/O error - connection is broken, just log and disconnect
    IoError,
}

/// Classify a framing error into an actionable category.
pub(super) fn classify_read_error(e: &ProtocolError) -> ReadErrorAction {
    match e {
        ProtocolError::LineTooLong { actual, limit } => ReadErrorAction::LineTooLong {
            actual: *actual,
            limit: *limit,
        },
        ProtocolError::Io(_) => ReadErrorAction::IoError,
        // Handle future variants gracefully
        _ => ReadErrorAction::IoError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line_too_long() {
        let e = ProtocolError::LineTooLong {
            actual: 5000,
            limit: 4096,
        };
        assert_eq!(
            classify_read_error(&e),
            ReadErrorAction::LineTooLong {
                actual: 5000,
                limit: 4096
            }
        );
    }

    #[test]
    fn test_classify_io() {
        let e = ProtocolError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ));
        assert_eq!(classify_read_error(&e), ReadErrorAction::IoError);
    }
}
