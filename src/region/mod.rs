//! Region collaborator.
//!
//! The gateway never owns the scene. It talks to a [`Region`] that can
//! deliver chat, enumerate presences and track attached [`ClientView`]s.
//! [`LocalRegion`] is the in-process implementation used by the binary.

mod client;
mod local;

pub use client::{CapabilityError, ClientView};
pub use local::LocalRegion;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::state::ClientId;

/// Region-side operations the gateway, bots and tests depend on.
///
/// Implementations must tolerate concurrent calls from every connection task.
pub trait Region: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver a chat event to everyone in the region except its sender.
    fn deliver_chat(&self, chat: ChatMessage);

    /// Current presences, in a stable order.
    fn list_current_presences(&self) -> Vec<Presence>;

    fn attach(&self, view: Arc<dyn ClientView>);

    fn detach(&self, id: &ClientId);

    /// A client asked to leave (e.g. IRC QUIT).
    fn on_disconnect_requested(&self, id: &ClientId);

    /// Move an attached client.
    fn teleport(&self, id: &ClientId, to: Vector3) -> Result<(), CapabilityError>;
}

/// Who said something.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: ClientId,
    pub name: String,
}

/// Audibility of a chat event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatScope {
    Say,
    Shout,
    Broadcast,
}

/// One chat event in the region.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub sender: Identity,
    pub channel: i32,
    pub text: String,
    pub position: Vector3,
    pub scope: ChatScope,
}

/// An avatar listed by the region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presence {
    pub display_name: String,
}

impl Presence {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Region-local position in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vector3::new(x, y, z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}

/// Error parsing a [`Vector3`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vector '{0}', expected x,y,z")]
pub struct ParseVectorError(pub String);

impl FromStr for Vector3 {
    type Err = ParseVectorError;

    /// Accepts `x,y,z` with optional `<` `>` brackets and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('<').trim_end_matches('>');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseVectorError(s.to_string()));
        }
        let mut xyz = [0.0f32; 3];
        for (slot, part) in xyz.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| ParseVectorError(s.to_string()))?;
        }
        Ok(Vector3::from(xyz))
    }
}
