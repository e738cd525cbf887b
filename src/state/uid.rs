//! Client identifiers.
//!
//! Ids come from an [`IdGenerator`] owned by whoever admits clients (the
//! gateway, the bot spawner) instead of a process-wide counter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for a client attached to the region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(Uuid);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<Uuid> for ClientId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Generates client ids and per-kind sequence numbers.
///
/// Sequence numbers start at 1 and are used for generated bot names
/// ("Default RexBot1", "Default RexBot2", ...).
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Fresh random client id.
    pub fn next_id(&self) -> ClientId {
        ClientId(Uuid::new_v4())
    }

    /// Next sequence number.
    pub fn next_sequence(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
