//! Dispatch harness for handler tests.

use crate::error::HandlerResult;
use crate::handlers::{Context, Registry};
use crate::network::testing::SharedBuffer;
use crate::network::{IrcClientView, ReplySink};
use crate::region::{CapabilityError, ChatMessage, ClientView, Presence, Region, Vector3};
use crate::state::{ClientId, IdGenerator, ServerInfo, SessionState};
use parking_lot::Mutex;
use simbridge_proto::Message;
use std::sync::Arc;

/// Region that records chat and lists a fixed set of presences.
#[derive(Default)]
pub(crate) struct RecordingRegion {
    presences: Mutex<Vec<Presence>>,
    chats: Mutex<Vec<ChatMessage>>,
}

impl RecordingRegion {
    pub(crate) fn set_presences(&self, names: &[&str]) {
        *self.presences.lock() = names.iter().map(|n| Presence::new(*n)).collect();
    }

    pub(crate) fn chats(&self) -> Vec<ChatMessage> {
        self.chats.lock().clone()
    }
}

impl Region for RecordingRegion {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver_chat(&self, chat: ChatMessage) {
        self.chats.lock().push(chat);
    }

    fn list_current_presences(&self) -> Vec<Presence> {
        self.presences.lock().clone()
    }

    fn attach(&self, _view: Arc<dyn ClientView>) {}

    fn detach(&self, _id: &ClientId) {}

    fn on_disconnect_requested(&self, _id: &ClientId) {}

    fn teleport(&self, id: &ClientId, _to: Vector3) -> Result<(), CapabilityError> {
        Err(CapabilityError::NotAttached(*id))
    }
}

/// One simulated connection: dispatches lines and captures replies.
pub(crate) struct Harness {
    pub(crate) uid: ClientId,
    pub(crate) info: ServerInfo,
    pub(crate) region: Arc<RecordingRegion>,
    pub(crate) view: Arc<IrcClientView>,
    pub(crate) state: SessionState,
    registry: Registry,
    sink: ReplySink,
    buffer: SharedBuffer,
}

impl Harness {
    pub(crate) fn new(region_name: &str) -> Self {
        let uid = IdGenerator::new().next_id();
        let buffer = SharedBuffer::default();
        let (view, _chat_rx) = IrcClientView::new(uid);
        Self {
            uid,
            info: ServerInfo::new("OpenSimulator", region_name),
            region: Arc::new(RecordingRegion::default()),
            view,
            state: SessionState::default(),
            registry: Registry::new(),
            sink: ReplySink::new(buffer.clone()),
            buffer,
        }
    }

    /// Tokenize and dispatch one line.
    pub(crate) async fn line(&mut self, raw: &str) -> HandlerResult {
        let msg = Message::parse(raw).expect("test line carries a command");
        let mut ctx = Context {
            uid: &self.uid,
            remote_addr: "127.0.0.1:6667".parse().expect("literal address"),
            info: &self.info,
            region: self.region.as_ref(),
            view: &self.view,
            sender: &self.sink,
            state: &mut self.state,
        };
        self.registry.dispatch(&mut ctx, &msg).await
    }

    /// Replies written since the last call.
    pub(crate) fn output(&self) -> Vec<String> {
        let lines = self.buffer.lines();
        self.buffer.clear();
        lines
    }
}
