//! Channel handlers and the join announcement.
//!
//! The bridge exposes exactly one channel, derived from the region name.
//! Clients never JOIN it explicitly; registration announces it instead.

mod names;
mod topic;

pub use names::NamesHandler;
pub use topic::TopicHandler;

use crate::error::HandlerResult;
use crate::handlers::Context;

/// Topic plus name list, sent whenever NICK or USER completes registration
/// (and again on every later NICK or USER).
pub async fn send_join_announcement(ctx: &Context<'_>) -> HandlerResult {
    if !ctx.state.is_registered() {
        return Ok(());
    }

    let mut replies = vec![topic::topic_reply(ctx)];
    replies.extend(names::names_replies(ctx));
    ctx.send_all(&replies).await
}
