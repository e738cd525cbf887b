//! Reply encoder.
//!
//! Numeric replies use the gateway's fixed quoting convention,
//! `<code> <NAME> "<text>"`, which existing clients parse literally.

use std::fmt;

use crate::response::Response;

/// One outbound line, without terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Numeric reply with quoted text.
    Numeric {
        /// Reply code.
        response: Response,
        /// Text placed between the quotes.
        text: String,
    },
    /// Answer to a client PING.
    Pong(String),
    /// Region chat relayed to a client.
    Privmsg {
        /// Speaker, spaces removed.
        from: String,
        /// Channel name.
        target: String,
        /// Chat text.
        text: String,
    },
}

impl Reply {
    /// Numeric reply.
    pub fn numeric(response: Response, text: impl Into<String>) -> Self {
        Self::Numeric {
            response,
            text: text.into(),
        }
    }

    /// `421 ERR_UNKNOWNCOMMAND` for a verb the gateway does not know.
    pub fn unknown_command(command: &str) -> Self {
        Self::numeric(
            Response::ERR_UNKNOWNCOMMAND,
            format!("{} :Unknown command", command),
        )
    }

    /// `421 ERR_UNKNOWNCOMMAND` for a verb that is recognized but unsupported.
    pub fn unimplemented_command(command: &str) -> Self {
        Self::numeric(
            Response::ERR_UNKNOWNCOMMAND,
            format!("{} :Command unimplemented", command),
        )
    }

    /// Relayed chat line. Whitespace in `from` is removed so the speaker
    /// stays a single token.
    pub fn privmsg(from: &str, target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Privmsg {
            from: from.chars().filter(|c| !c.is_whitespace()).collect(),
            target: target.into(),
            text: text.into(),
        }
    }

    /// Numeric code, if any.
    pub fn response(&self) -> Option<Response> {
        match self {
            Self::Numeric { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// Wire form including the CRLF terminator.
    pub fn to_line(&self) -> String {
        let mut line = self.to_string();
        line.push_str("\r\n");
        line
    }
}

/// Text written into a reply line. CR, LF and NUL become spaces so a reply
/// is always exactly one line.
struct OneLine<'a>(&'a str);

impl fmt::Display for OneLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in self.0.split_inclusive(['\r', '\n', '\0']) {
            match part.strip_suffix(['\r', '\n', '\0']) {
                Some(head) => {
                    f.write_str(head)?;
                    f.write_str(" ")?;
                }
                None => f.write_str(part)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric { response, text } => {
                write!(f, "{} \"{}\"", response, OneLine(text))
            }
            Self::Pong(token) => write!(f, "PONG {}", OneLine(token)),
            Self::Privmsg { from, target, text } => write!(
                f,
                ":{} PRIVMSG {} :{}",
                OneLine(from),
                OneLine(target),
                OneLine(text)
            ),
        }
    }
}
