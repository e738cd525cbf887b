//! Per-connection registration state.
//!
//! ```text
//! Unregistered ──NICK──▶ NickSet ──USER──▶ Registered
//!      │                                      ▲
//!      └────────USER──▶ UserSet ──NICK────────┘
//! ```
//!
//! Flags only ever go from unset to set; a second NICK replaces the
//! nickname but never clears the flag.

/// Coarse registration phase derived from the two flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationPhase {
    Unregistered,
    NickSet,
    UserSet,
    Registered,
}

/// State owned by one connection's loop.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Nickname from the last NICK.
    pub nick: Option<String>,
    /// Username (first USER parameter).
    pub user: Option<String>,
    /// Real name (fourth USER parameter); becomes the display name.
    pub realname: Option<String>,
}

impl SessionState {
    pub fn has_nick(&self) -> bool {
        self.nick.is_some()
    }

    pub fn has_user(&self) -> bool {
        self.user.is_some()
    }

    /// Both NICK and USER have been processed.
    pub fn is_registered(&self) -> bool {
        self.has_nick() && self.has_user()
    }

    pub fn phase(&self) -> RegistrationPhase {
        match (self.has_nick(), self.has_user()) {
            (false, false) => RegistrationPhase::Unregistered,
            (true, false) => RegistrationPhase::NickSet,
            (false, true) => RegistrationPhase::UserSet,
            (true, true) => RegistrationPhase::Registered,
        }
    }

    /// Name shown to the region: the real name, else the nickname.
    pub fn display_name(&self) -> Option<&str> {
        self.realname
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.nick.as_deref())
    }

    /// Get the nick or "*" for log fields.
    pub fn nick_or_star(&self) -> &str {
        self.nick.as_deref().unwrap_or("*")
    }
}
