//! Client views attached to a region.
//!
//! A view implements only what its transport can do. Optional capabilities
//! default to [`CapabilityError::Unsupported`] so callers learn about the
//! gap instead of hitting a stub.

use std::fmt;

use super::{ChatMessage, Presence, Vector3};
use crate::state::ClientId;

/// Optional client operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Teleport,
    Disconnect,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Teleport => "teleport",
            Self::Disconnect => "disconnect",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    #[error("{capability} is not supported by this client")]
    Unsupported { capability: Capability },
    #[error("client is gone")]
    Closed,
    #[error("client is not keeping up with chat")]
    QueueFull,
    #[error("no client {0} in region")]
    NotAttached(ClientId),
}

/// The region's handle on one connected client.
pub trait ClientView: Send + Sync {
    fn id(&self) -> &ClientId;

    /// Listed presence, or `None` while the client has no identity yet.
    fn presence(&self) -> Option<Presence>;

    /// Region chat heard by this client.
    fn send_chat(&self, chat: &ChatMessage) -> Result<(), CapabilityError>;

    fn teleport(&self, _to: Vector3) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported {
            capability: Capability::Teleport,
        })
    }

    /// Ask the client's transport to close.
    fn disconnect(&self) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unsupported {
            capability: Capability::Disconnect,
        })
    }
}
