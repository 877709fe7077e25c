//! Per-turn conversation orchestration

use std::fmt;
use std::sync::Arc;

use moodify_core::config::schema::Config;
use moodify_core::session::SessionStore;
use moodify_providers::{CompletionGateway, GatewayError};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::emotion::{classifier_from_config, EmotionClassifier, EmotionResult};
use crate::prompt::PromptComposer;

/// Apology returned when the completion endpoint answers with an error status
pub const UPSTREAM_APOLOGY: &str = "Sorry, something went wrong.";

/// Apology returned when the completion endpoint is unreachable or answers garbage
pub const CONNECTION_APOLOGY: &str = "Sorry, there was an error connecting to the AI service.";

/// A successful turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Two-decimal string, present only when the classifier reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
}

impl ChatReply {
    fn new(response: String, emotion: Option<&EmotionResult>) -> Self {
        Self {
            response,
            emotion: emotion.map(|e| e.label.clone()),
            emoji: emotion.map(|e| e.emoji().to_string()),
            confidence: emotion
                .and_then(|e| e.confidence)
                .map(|c| format!("{:.2}", c)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Upstream,
    Transport,
    Protocol,
}

/// A failed turn. Only [`ChatFailure::apology`] is meant for the user.
#[derive(Debug, Clone)]
pub struct ChatFailure {
    pub kind: FailureKind,
    pub cause: String,
}

impl ChatFailure {
    pub fn apology(&self) -> &'static str {
        match self.kind {
            FailureKind::Upstream => UPSTREAM_APOLOGY,
            FailureKind::Transport | FailureKind::Protocol => CONNECTION_APOLOGY,
        }
    }
}

impl From<GatewayError> for ChatFailure {
    fn from(e: GatewayError) -> Self {
        let kind = match &e {
            GatewayError::Upstream { .. } => FailureKind::Upstream,
            GatewayError::Transport(_) => FailureKind::Transport,
            GatewayError::Protocol(_) => FailureKind::Protocol,
        };
        Self {
            kind,
            cause: e.to_string(),
        }
    }
}

impl fmt::Display for ChatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} failure: {}", self.kind, self.cause)
    }
}

impl std::error::Error for ChatFailure {}

/// Coordinates classification, prompting, session history and the
/// completion call for each incoming message.
pub struct ConversationOrchestrator {
    store: Arc<SessionStore>,
    gateway: Arc<dyn CompletionGateway>,
    classifier: Option<Arc<dyn EmotionClassifier>>,
    composer: PromptComposer,
    default_session_id: String,
}

impl ConversationOrchestrator {
    pub fn new(
        store: Arc<SessionStore>,
        gateway: Arc<dyn CompletionGateway>,
        composer: PromptComposer,
    ) -> Self {
        Self {
            store,
            gateway,
            classifier: None,
            composer,
            default_session_id: "default".to_string(),
        }
    }

    /// Wire up store, classifier and composer from configuration.
    pub fn from_config(config: &Config, gateway: Arc<dyn CompletionGateway>) -> Self {
        let composer = PromptComposer::new(config.conversation.prompt_mode);
        let store = SessionStore::new(
            config.conversation.history_cap,
            config.conversation.clear_policy,
        )
        .with_reset_message(composer.reset_prompt());

        let mut orchestrator = Self::new(Arc::new(store), gateway, composer)
            .with_default_session_id(config.conversation.default_session_id.clone());
        orchestrator.classifier = classifier_from_config(&config.emotion);
        orchestrator
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn EmotionClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_default_session_id(mut self, id: impl Into<String>) -> Self {
        self.default_session_id = id.into();
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn classifier_name(&self) -> Option<&'static str> {
        self.classifier.as_ref().map(|c| c.name())
    }

    /// Missing or blank ids fall back to the default session.
    pub fn resolve_session_id(&self, session_id: Option<&str>) -> String {
        session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.default_session_id)
            .to_string()
    }

    /// Run one conversation turn.
    ///
    /// The session stays locked from the user append until the assistant
    /// reply is stored, so turns on one session never interleave. On failure
    /// the user message is kept and nothing else is appended.
    pub async fn handle_chat(
        &self,
        session_id: Option<&str>,
        text: &str,
    ) -> Result<ChatReply, ChatFailure> {
        let session_id = self.resolve_session_id(session_id);

        let emotion = match &self.classifier {
            Some(classifier) => Some(classifier.classify(text).await),
            None => None,
        };
        let system = self
            .composer
            .compose(emotion.as_ref().map(|e| e.label.as_str()));

        let mut session = self.store.lock(&session_id).await;
        session.append_user(system, text);
        debug!(
            session_id = %session_id,
            history_len = session.messages().len(),
            "Forwarding conversation to {}",
            self.gateway.endpoint()
        );

        match self.gateway.complete(session.messages()).await {
            Ok(reply) => {
                session.append_assistant(reply.clone());
                info!(
                    session_id = %session_id,
                    emotion = emotion.as_ref().map(|e| e.label.as_str()).unwrap_or("-"),
                    "Chat turn completed"
                );
                Ok(ChatReply::new(reply, emotion.as_ref()))
            }
            Err(e) => {
                let failure = ChatFailure::from(e);
                error!(
                    session_id = %session_id,
                    kind = ?failure.kind,
                    "Completion failed: {}",
                    failure.cause
                );
                Err(failure)
            }
        }
    }

    /// Clear a session under the configured policy. Always succeeds.
    pub async fn clear(&self, session_id: Option<&str>) -> bool {
        let session_id = self.resolve_session_id(session_id);
        let cleared = self.store.clear(&session_id).await;
        info!(session_id = %session_id, cleared, "Session clear requested");
        cleared
    }
}
