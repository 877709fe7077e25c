//! HTTP surfaces for moodify
//!
//! [`chat_router`] serves the chat front-end, [`relay_router`] the
//! authenticated pass-through to the LLM provider.

pub mod error;
pub mod handlers;
pub mod relay;
pub mod server;
pub mod state;

pub use error::{ApiError, RelayError};
pub use server::{chat_router, relay_router, run_server};
pub use state::{AppState, RelayState};
