//! Error types shared across the gateway.
//!
//! Each layer owns one `thiserror` enum; binaries and spawned tasks wrap
//! them in `anyhow`.

use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error("send error: {0}")]
    Send(#[from] std::io::Error),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::Quit(_) => "quit",
            Self::Send(_) => "send_error",
        }
    }

    /// Whether the connection loop must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Quit(_) | Self::Send(_))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// WebDAV Errors (request handling)
// ============================================================================

/// Faults raised while serving a WebDAV request.
///
/// Every variant maps to `500` with an empty body at the router boundary.
#[derive(Debug, Error)]
pub enum DavError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DavError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Xml(_) => "xml",
            Self::BadRequest(_) => "bad_request",
            Self::Header(_) => "header",
            Self::Io(_) => "io",
        }
    }
}

impl From<std::string::FromUtf8Error> for DavError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::BadRequest(e.to_string())
    }
}
