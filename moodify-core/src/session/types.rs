//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message in the OpenAI `{role, content}` shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// A conversation session
///
/// History is only mutated through the append methods so that at most one
/// system message exists, always at index 0, and the number of non-system
/// messages never exceeds the cap passed in.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Caller-supplied session id
    pub id: String,
    messages: Vec<Message>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new, empty session
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full ordered history, system message first when present
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system_message(&self) -> Option<&Message> {
        self.messages.first().filter(|m| m.is_system())
    }

    /// Number of user and assistant messages
    pub fn non_system_len(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_system()).count()
    }

    /// Refresh the system message and append a user turn.
    ///
    /// Any previous system message is replaced by `system`, the oldest
    /// non-system messages are dropped so at most `cap` remain.
    pub fn append_user(&mut self, system: Message, content: impl Into<String>, cap: usize) {
        self.messages.retain(|m| !m.is_system());
        self.messages.push(Message::user(content));
        self.truncate_non_system(cap);
        self.messages.insert(0, system);
        self.updated_at = Utc::now();
    }

    /// Append an assistant reply, keeping the current system message.
    pub fn append_assistant(&mut self, content: impl Into<String>, cap: usize) {
        self.messages.push(Message::assistant(content));
        self.truncate_non_system(cap);
        self.updated_at = Utc::now();
    }

    /// Replace the history with a single system message
    pub fn reset(&mut self, system: Option<Message>) {
        self.messages.clear();
        self.messages.extend(system);
        self.updated_at = Utc::now();
    }

    fn truncate_non_system(&mut self, cap: usize) {
        let excess = self.non_system_len().saturating_sub(cap);
        if excess == 0 {
            return;
        }
        let mut to_drop = excess;
        self.messages.retain(|m| {
            if to_drop > 0 && !m.is_system() {
                to_drop -= 1;
                false
            } else {
                true
            }
        });
    }
}
