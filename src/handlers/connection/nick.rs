//! NICK command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, send_join_announcement};
use async_trait::async_trait;
use simbridge_proto::Message;
use tracing::debug;

/// Handler for NICK command.
///
/// `NICK <nickname>`. The nickname is the fallback identity when USER
/// never supplied a real name.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let nick = msg
            .arg(0)
            .filter(|nick| !nick.is_empty())
            .ok_or(HandlerError::NeedMoreParams)?;

        let old = ctx.state.nick.replace(nick.to_owned());
        debug!(uid = %ctx.uid, old = ?old, new = %nick, phase = ?ctx.state.phase(), "Nick set");

        ctx.sync_identity();
        send_join_announcement(ctx).await
    }
}
