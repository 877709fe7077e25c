use std::sync::Arc;

use moodify_agent::ConversationOrchestrator;
use moodify_providers::ProviderClient;
use serde::{Deserialize, Serialize};

/// Shared state of the chat front-end
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<ConversationOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Shared state of the relay
#[derive(Clone)]
pub struct RelayState {
    pub provider: Arc<ProviderClient>,
}

impl RelayState {
    pub fn new(provider: Arc<ProviderClient>) -> Self {
        Self { provider }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartChatRequest {
    #[serde(default)]
    pub start: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartChatResponse {
    pub status: &'static str,
    pub start: Option<bool>,
}

/// Body of a failed chat turn; mirrors the success shape so clients can
/// always render `response`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatFailureResponse {
    pub response: &'static str,
}
