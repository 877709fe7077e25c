//! Conversation logic for moodify
//!
//! This crate provides emotion classification, system prompt composition and
//! the orchestrator that runs each chat turn against a completion gateway.

pub mod emotion;
pub mod orchestrator;
pub mod prompt;

pub use emotion::{
    classifier_from_config, emoji_for, Emotion, EmotionClassifier, EmotionResult,
    HostedClassifier, LexicalClassifier,
};
pub use orchestrator::{
    ChatFailure, ChatReply, ConversationOrchestrator, FailureKind, CONNECTION_APOLOGY,
    UPSTREAM_APOLOGY,
};
pub use prompt::PromptComposer;
