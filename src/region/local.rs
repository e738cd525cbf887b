//! In-process region.
//!
//! Holds configured static presences plus every attached client view.
//! Chat is fanned out synchronously; views queue it for their own tasks.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace};

use super::{CapabilityError, ChatMessage, ClientView, Presence, Region, Vector3};
use crate::state::ClientId;

struct Attached {
    /// Attach order, for stable presence listings.
    seq: u64,
    view: Arc<dyn ClientView>,
}

pub struct LocalRegion {
    name: String,
    seeded: Vec<Presence>,
    clients: DashMap<ClientId, Attached>,
    next_seq: AtomicU64,
}

impl LocalRegion {
    pub fn new(name: impl Into<String>, seeded: Vec<Presence>) -> Self {
        Self {
            name: name.into(),
            seeded,
            clients: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Number of attached views.
    #[cfg(test)]
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Ids of attached views, in attach order.
    #[cfg(test)]
    pub fn client_ids(&self) -> Vec<ClientId> {
        self.ordered_views().iter().map(|view| *view.id()).collect()
    }

    fn ordered_views(&self) -> Vec<Arc<dyn ClientView>> {
        let mut attached: Vec<(u64, Arc<dyn ClientView>)> = self
            .clients
            .iter()
            .map(|entry| (entry.seq, Arc::clone(&entry.view)))
            .collect();
        attached.sort_by_key(|(seq, _)| *seq);
        attached.into_iter().map(|(_, view)| view).collect()
    }
}

impl Region for LocalRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver_chat(&self, chat: ChatMessage) {
        debug!(
            region = %self.name,
            from = %chat.sender.name,
            channel = chat.channel,
            scope = ?chat.scope,
            "Region chat"
        );
        // Collect first so no shard lock is held while views run.
        for view in self.ordered_views() {
            if view.id() == &chat.sender.id {
                continue;
            }
            if let Err(e) = view.send_chat(&chat) {
                trace!(client = %view.id(), error = %e, "Chat not delivered");
            }
        }
    }

    fn list_current_presences(&self) -> Vec<Presence> {
        let mut presences = self.seeded.clone();
        presences.extend(self.ordered_views().iter().filter_map(|view| view.presence()));
        presences
    }

    fn attach(&self, view: Arc<dyn ClientView>) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = *view.id();
        self.clients.insert(id, Attached { seq, view });
        info!(region = %self.name, client = %id, "Client attached");
    }

    fn detach(&self, id: &ClientId) {
        if self.clients.remove(id).is_some() {
            info!(region = %self.name, client = %id, "Client detached");
        }
    }

    fn on_disconnect_requested(&self, id: &ClientId) {
        let Some((_, attached)) = self.clients.remove(id) else {
            return;
        };
        info!(region = %self.name, client = %id, "Disconnect requested");
        if let Err(e) = attached.view.disconnect() {
            trace!(client = %id, error = %e, "Disconnect not forwarded");
        }
    }

    fn teleport(&self, id: &ClientId, to: Vector3) -> Result<(), CapabilityError> {
        let view = self
            .clients
            .get(id)
            .map(|entry| Arc::clone(&entry.view))
            .ok_or(CapabilityError::NotAttached(*id))?;
        view.teleport(to)
    }
}
