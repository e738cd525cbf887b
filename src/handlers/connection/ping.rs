//! PING handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply};

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // PING <token>
        let token = msg.arg(0).ok_or(HandlerError::NeedMoreParams)?;
        ctx.send(Reply::Pong(token.to_owned())).await
    }
}
