//! MOTD command handler.
//!
//! `MOTD [target]`
//!
//! Returns the configured message of the day.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply, Response};

/// Handler for MOTD command.
pub struct MotdHandler;

#[async_trait]
impl Handler for MotdHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        let mut replies = Vec::with_capacity(ctx.info.motd.len() + 2);

        // RPL_MOTDSTART (375): :- <server> Message of the day -
        replies.push(Reply::numeric(
            Response::RPL_MOTDSTART,
            format!(":- {} Message of the day -", ctx.info.name),
        ));

        // RPL_MOTD (372): one per configured line
        for line in &ctx.info.motd {
            replies.push(Reply::numeric(Response::RPL_MOTD, format!(":{}", line)));
        }

        // RPL_ENDOFMOTD (376)
        replies.push(Reply::numeric(
            Response::RPL_ENDOFMOTD,
            ":End of /MOTD command",
        ));

        ctx.send_all(&replies).await
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;

    #[tokio::test]
    async fn test_motd_block() {
        let mut h = Harness::new("R");
        h.info.motd = vec!["- Hiya!".into(), "- Be nice".into()];
        h.line("MOTD irc.example.net").await.unwrap();
        assert_eq!(
            h.output(),
            vec![
                "375 RPL_MOTDSTART \":- OpenSimulator Message of the day -\"",
                "372 RPL_MOTD \":- Hiya!\"",
                "372 RPL_MOTD \":- Be nice\"",
                "376 RPL_ENDOFMOTD \":End of /MOTD command\"",
            ]
        );
    }
}
