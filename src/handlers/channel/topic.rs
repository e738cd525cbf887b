//! TOPIC command handler.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply, Response};

/// Handler for TOPIC command. The topic is fixed by configuration.
pub struct TopicHandler;

pub(super) fn topic_reply(ctx: &Context<'_>) -> Reply {
    Reply::numeric(
        Response::RPL_TOPIC,
        format!("{} :{}", ctx.info.channel, ctx.info.topic),
    )
}

#[async_trait]
impl Handler for TopicHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        ctx.send(topic_reply(ctx)).await
    }
}
