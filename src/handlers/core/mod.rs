//! Core handler infrastructure.
//!
//! The handler trait, the per-line context, and the registry that maps
//! verbs to handlers.

pub mod context;
pub mod registry;

pub use context::{Context, Handler};
pub use registry::Registry;
