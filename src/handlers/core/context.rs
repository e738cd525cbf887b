//! Command handler context.
//!
//! A `Context` lives for one dispatched line. It borrows the connection's
//! session state mutably and everything else shared.

use crate::error::HandlerResult;
use crate::network::{IrcClientView, ReplySink};
use crate::region::Region;
use crate::state::{ClientId, ServerInfo, SessionState};
use async_trait::async_trait;
use simbridge_proto::{Message, Reply};
use std::net::SocketAddr;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The client's unique ID.
    pub uid: &'a ClientId,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
    /// Server name, bound channel, topic and MOTD.
    pub info: &'a ServerInfo,
    /// Region this connection bridges into.
    pub region: &'a dyn Region,
    /// This connection as the region sees it.
    pub view: &'a IrcClientView,
    /// Writer for replies to this client.
    pub sender: &'a ReplySink,
    /// Registration state.
    pub state: &'a mut SessionState,
}

impl Context<'_> {
    /// Send a single reply.
    pub async fn send(&self, reply: Reply) -> HandlerResult {
        self.sender.send(&reply).await?;
        Ok(())
    }

    /// Send replies as one uninterrupted block.
    pub async fn send_all(&self, replies: &[Reply]) -> HandlerResult {
        self.sender.send_all(replies).await?;
        Ok(())
    }

    /// Publish the display name to the region once registration completes.
    pub fn sync_identity(&self) {
        if self.state.is_registered() {
            self.view
                .set_identity(self.state.display_name().map(str::to_owned));
        }
    }
}

/// A handler for one IRC verb.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
