//! The region's view of one IRC connection.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};
use tracing::warn;

use crate::region::{CapabilityError, ChatMessage, ClientView, Presence};
use crate::state::ClientId;

/// Chat lines queued for one client before it counts as too slow.
pub const CHAT_QUEUE: usize = 32;

/// Chat heard before registration is dropped; the client has no channel yet.
/// A client whose queue fills up is disconnected.
pub struct IrcClientView {
    id: ClientId,
    /// Display name, set once the connection is registered.
    identity: RwLock<Option<String>>,
    chat_tx: mpsc::Sender<ChatMessage>,
    closed: Notify,
}

impl IrcClientView {
    pub fn new(id: ClientId) -> (Arc<Self>, mpsc::Receiver<ChatMessage>) {
        let (chat_tx, chat_rx) = mpsc::channel(CHAT_QUEUE);
        let view = Arc::new(Self {
            id,
            identity: RwLock::new(None),
            chat_tx,
            closed: Notify::new(),
        });
        (view, chat_rx)
    }

    pub fn set_identity(&self, name: Option<String>) {
        *self.identity.write() = name;
    }

    pub fn name(&self) -> Option<String> {
        self.identity.read().clone()
    }

    /// Resolves once the region asked this client to disconnect.
    pub async fn closed(&self) {
        self.closed.notified().await
    }
}

impl ClientView for IrcClientView {
    fn id(&self) -> &ClientId {
        &self.id
    }

    fn presence(&self) -> Option<Presence> {
        self.name().map(Presence::new)
    }

    fn send_chat(&self, chat: &ChatMessage) -> Result<(), CapabilityError> {
        if self.identity.read().is_none() {
            return Ok(());
        }
        match self.chat_tx.try_send(chat.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(client = %self.id, "SendQ exceeded - disconnecting");
                self.closed.notify_one();
                Err(CapabilityError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(CapabilityError::Closed),
        }
    }

    fn disconnect(&self) -> Result<(), CapabilityError> {
        self.closed.notify_one();
        Ok(())
    }
}
