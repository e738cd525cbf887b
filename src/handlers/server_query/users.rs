//! USERS command handler.
//!
//! One row per presence, in the fixed-width layout of RFC 1459 USERS.

use crate::error::HandlerResult;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply, Response};

/// Width of the user id column.
const USER_ID_WIDTH: usize = 8;

/// Handler for USERS command.
pub struct UsersHandler;

fn user_row(display_name: &str) -> String {
    let compact = display_name.replace(' ', "");
    format!(
        ":{:<width$.width$} terminal_ hostname",
        compact,
        width = USER_ID_WIDTH
    )
}

#[async_trait]
impl Handler for UsersHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        let mut replies = vec![Reply::numeric(
            Response::RPL_USERSSTART,
            ":UserID   Terminal  Host",
        )];
        replies.extend(
            ctx.region
                .list_current_presences()
                .iter()
                .map(|p| Reply::numeric(Response::RPL_USERS, user_row(&p.display_name))),
        );
        replies.push(Reply::numeric(Response::RPL_ENDOFUSERS, ":End of users"));

        ctx.send_all(&replies).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Harness;

    #[test]
    fn test_user_row_width() {
        assert_eq!(user_row("Ann"), ":Ann      terminal_ hostname");
        assert_eq!(user_row("Rex Bot"), ":RexBot   terminal_ hostname");
        assert_eq!(user_row("Bartholomew Longname"), ":Bartholo terminal_ hostname");
    }

    #[tokio::test]
    async fn test_users_listing() {
        let mut h = Harness::new("R");
        h.region.set_presences(&["Ann Avatar"]);
        h.line("USERS x").await.unwrap();
        assert_eq!(
            h.output(),
            vec![
                "392 RPL_USERSSTART \":UserID   Terminal  Host\"",
                "393 RPL_USERS \":AnnAvata terminal_ hostname\"",
                "394 RPL_ENDOFUSERS \":End of users\"",
            ]
        );
    }
}
