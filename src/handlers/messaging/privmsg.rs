//! PRIVMSG command handler.
//!
//! Text addressed to the bound channel becomes region chat on channel 0.
//! Anything else would be a direct message, which the bridge does not route.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use crate::region::{ChatMessage, ChatScope, Identity, Vector3};
use async_trait::async_trait;
use simbridge_proto::Message;
use tracing::debug;

/// Region chat channel that IRC traffic maps to.
pub const PUBLIC_CHANNEL: i32 = 0;

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // PRIVMSG <target> <text>
        let text = msg.arg(1).ok_or(HandlerError::NeedMoreParams)?;
        let target = msg.arg(0).unwrap_or_default();

        if target != ctx.info.channel {
            debug!(uid = %ctx.uid, target = %target, "Direct message not routed");
            return Ok(());
        }

        ctx.region.deliver_chat(ChatMessage {
            sender: Identity {
                id: *ctx.uid,
                name: ctx.state.display_name().unwrap_or("*").to_owned(),
            },
            channel: PUBLIC_CHANNEL,
            text: text.to_owned(),
            position: Vector3::ZERO,
            scope: ChatScope::Broadcast,
        });
        Ok(())
    }
}
