//! NAMES command handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply, Response};

/// Handler for NAMES command.
///
/// Lists every presence the region reports, each voiced, with spaces
/// removed so a name stays one token.
pub struct NamesHandler;

pub(super) fn names_replies(ctx: &Context<'_>) -> Vec<Reply> {
    let channel = &ctx.info.channel;
    let mut replies: Vec<Reply> = ctx
        .region
        .list_current_presences()
        .iter()
        .map(|presence| {
            Reply::numeric(
                Response::RPL_NAMREPLY,
                format!("{} :+{}", channel, presence.display_name.replace(' ', "")),
            )
        })
        .collect();
    replies.push(Reply::numeric(
        Response::RPL_ENDOFNAMES,
        format!("{} :End of /NAMES list", channel),
    ));
    replies
}

#[async_trait]
impl Handler for NamesHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        let replies = names_replies(ctx);
        ctx.send_all(&replies).await
    }
}
