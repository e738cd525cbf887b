//! USER command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler, send_join_announcement};
use async_trait::async_trait;
use simbridge_proto::Message;
use tracing::debug;

/// Handler for USER command.
///
/// `USER <username> <hostname> <servername> <realname>`
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let realname = msg.arg(3).ok_or(HandlerError::NeedMoreParams)?;
        let username = msg.arg(0).unwrap_or_default();

        ctx.state.user = Some(username.to_owned());
        ctx.state.realname = Some(realname.to_owned());
        debug!(uid = %ctx.uid, user = %username, realname = %realname, "User set");

        ctx.sync_identity();
        send_join_announcement(ctx).await
    }
}
