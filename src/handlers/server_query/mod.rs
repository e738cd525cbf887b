//! Server query handlers and the fixed-reply verb tiers.

mod disabled;
mod motd;
mod users;

pub use disabled::{IgnoredHandler, UnimplementedHandler};
pub use motd::MotdHandler;
pub use users::UsersHandler;
