//! Handlers for recognized verbs the bridge does not act on.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply};
use tracing::trace;

/// Replies `421 ... :Command unimplemented`.
pub struct UnimplementedHandler;

#[async_trait]
impl Handler for UnimplementedHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        ctx.send(Reply::unimplemented_command(&msg.command)).await
    }
}

/// Accepts the verb and says nothing.
pub struct IgnoredHandler;

#[async_trait]
impl Handler for IgnoredHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        trace!(command = %msg.command, "Ignored");
        Ok(())
    }
}
