//! Numeric replies sent by the gateway.
//!
//! Only the numerics the gateway actually emits are listed. Names follow
//! RFC 2812.

#![allow(non_camel_case_types)]

use std::fmt;

/// Numeric reply code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 353 - One entry of a name list
    RPL_NAMREPLY = 353,
    /// 366 - End of name list
    RPL_ENDOFNAMES = 366,
    /// 372 - Message of the day line
    RPL_MOTD = 372,
    /// 375 - Start of message of the day
    RPL_MOTDSTART = 375,
    /// 376 - End of message of the day
    RPL_ENDOFMOTD = 376,
    /// 392 - Start of user list
    RPL_USERSSTART = 392,
    /// 393 - One entry of the user list
    RPL_USERS = 393,
    /// 394 - End of user list
    RPL_ENDOFUSERS = 394,
    /// 421 - Unknown or unimplemented command
    ERR_UNKNOWNCOMMAND = 421,
}

impl Response {
    /// Numeric value.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Symbolic name as written on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::RPL_TOPIC => "RPL_TOPIC",
            Self::RPL_NAMREPLY => "RPL_NAMREPLY",
            Self::RPL_ENDOFNAMES => "RPL_ENDOFNAMES",
            Self::RPL_MOTD => "RPL_MOTD",
            Self::RPL_MOTDSTART => "RPL_MOTDSTART",
            Self::RPL_ENDOFMOTD => "RPL_ENDOFMOTD",
            Self::RPL_USERSSTART => "RPL_USERSSTART",
            Self::RPL_USERS => "RPL_USERS",
            Self::RPL_ENDOFUSERS => "RPL_ENDOFUSERS",
            Self::ERR_UNKNOWNCOMMAND => "ERR_UNKNOWNCOMMAND",
        }
    }

    /// Whether this is an error numeric (400-599).
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }

    /// Look up a numeric by code.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            332 => Self::RPL_TOPIC,
            353 => Self::RPL_NAMREPLY,
            366 => Self::RPL_ENDOFNAMES,
            372 => Self::RPL_MOTD,
            375 => Self::RPL_MOTDSTART,
            376 => Self::RPL_ENDOFMOTD,
            392 => Self::RPL_USERSSTART,
            393 => Self::RPL_USERS,
            394 => Self::RPL_ENDOFUSERS,
            421 => Self::ERR_UNKNOWNCOMMAND,
            _ => return None,
        })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03} {}", self.code(), self.name())
    }
}
