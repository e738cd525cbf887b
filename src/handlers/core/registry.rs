//! Command handler registry and dispatch.
//!
//! The table is built once and never changes. Lookup is by exact verb, so
//! `privmsg` is an unknown command while `PRIVMSG` is not.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{NamesHandler, TopicHandler},
    connection::{NickHandler, PingHandler, QuitHandler, UserHandler},
    messaging::PrivmsgHandler,
    server_query::{IgnoredHandler, MotdHandler, UnimplementedHandler, UsersHandler},
};
use simbridge_proto::{Message, Reply};
use std::collections::HashMap;
use tracing::{Instrument, Level, debug, span};

/// Verbs that are accepted silently.
const IGNORED: &[&str] = &["PASS", "JOIN", "LIST", "NOTICE", "WHO", "PONG"];

/// Verbs that are recognized but not supported by the bridge.
const UNIMPLEMENTED: &[&str] = &[
    "ADMIN", "AWAY", "CONNECT", "DIE", "ERROR", "INFO", "INVITE", "ISON", "KICK", "KILL",
    "LINKS", "LUSERS", "MODE", "OPER", "PART", "REHASH", "SERVICE", "SERVLIST", "SERVER",
    "SQUERY", "SQUIT", "STATS", "SUMMON", "TIME", "TRACE", "USERHOST", "VERSION", "WALLOPS",
    "WHOIS", "WHOWAS",
];

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection/registration handlers
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));

        // Channel handlers
        handlers.insert("TOPIC", Box::new(TopicHandler));
        handlers.insert("NAMES", Box::new(NamesHandler));

        // Messaging handlers
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));

        // Server query handlers
        handlers.insert("MOTD", Box::new(MotdHandler));
        handlers.insert("USERS", Box::new(UsersHandler));

        for &verb in IGNORED {
            handlers.insert(verb, Box::new(IgnoredHandler));
        }
        for &verb in UNIMPLEMENTED {
            handlers.insert(verb, Box::new(UnimplementedHandler));
        }

        Self { handlers }
    }

    /// Whether `verb` has a table entry of any tier.
    #[cfg(test)]
    pub fn recognizes(&self, verb: &str) -> bool {
        self.handlers.contains_key(verb)
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Only `Quit` and `Send` errors escape; a handler that lacked
    /// parameters is answered here with the generic unknown-command reply.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Some(handler) = self.handlers.get(msg.command.as_str()) else {
            debug!(command = %msg.command, "Unknown command");
            return ctx.send(Reply::unknown_command(&msg.command)).await;
        };

        let irc_span = span!(
            Level::DEBUG,
            "irc.command",
            command = %msg.command,
            uid = %ctx.uid,
            source_nick = ctx.state.nick.as_deref(),
            remote_addr = %ctx.remote_addr,
        );

        match handler.handle(ctx, msg).instrument(irc_span).await {
            Err(HandlerError::NeedMoreParams) => {
                debug!(command = %msg.command, params = msg.arg_count(), "Not enough parameters");
                ctx.send(Reply::unknown_command(&msg.command)).await
            }
            Err(e) => {
                debug!(command = %msg.command, error = %e, "Command error");
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
