//! Conversation sessions
//!
//! Sessions hold the ordered message history sent upstream on every turn.
//! They live in memory only and disappear when cleared or on restart.

pub mod store;
pub mod types;

pub use store::{SessionGuard, SessionStore};
pub use types::{Message, Role, Session};
