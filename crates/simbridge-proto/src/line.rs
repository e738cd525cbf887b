//! CRLF line codec for tokio.
//!
//! Bytes accumulate in the caller's `BytesMut`; each `decode` call yields at
//! most one complete line with the terminator stripped. The scan always
//! covers the whole pending buffer, so a CR and LF that arrive in separate
//! reads are still recognized as one terminator.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};
use crate::CRLF;

/// Default ceiling for buffered bytes that have not yet seen a terminator.
pub const DEFAULT_MAX_LEN: usize = 4096;

/// Length of the first complete frame in `buf`, terminator included.
///
/// Returns `None` when no CRLF is present yet; the caller should read more
/// bytes and try again.
pub fn frame_len(buf: &[u8]) -> Option<usize> {
    find_crlf(buf, 0).map(|pos| pos + CRLF.len())
}

fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .map(|offset| from + offset)
}

/// Codec producing one `String` per CRLF-terminated line.
#[derive(Debug)]
pub struct LineCodec {
    /// Offset already scanned without finding a terminator.
    next_index: usize,
    /// Maximum unterminated bytes tolerated before failing.
    max_len: usize,
}

impl LineCodec {
    /// Codec with the default buffered-length ceiling.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    /// Codec with a custom buffered-length ceiling.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// Configured ceiling.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Back up one byte: the CR may have ended the previous read.
        let from = self.next_index.saturating_sub(1);
        match find_crlf(src, from) {
            Some(pos) => {
                let frame = src.split_to(pos + CRLF.len());
                self.next_index = 0;
                let line = String::from_utf8_lossy(&frame[..pos]).into_owned();
                Ok(Some(line))
            }
            None => {
                self.next_index = src.len();
                if src.len() > self.max_len {
                    return Err(ProtocolError::LineTooLong {
                        actual: src.len(),
                        limit: self.max_len,
                    });
                }
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // An unterminated tail at EOF is never a message.
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(line.len() + CRLF.len());
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(CRLF);
        Ok(())
    }
}
