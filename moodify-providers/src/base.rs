//! Completion gateway trait and shared wire types

use async_trait::async_trait;
use moodify_core::session::Message;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Error type for completion calls
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The endpoint answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The endpoint was unreachable or the request timed out
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Protocol(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<GatewayError> for moodify_core::Error {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Upstream { status, body } => {
                moodify_core::Error::Upstream { status, body }
            }
            GatewayError::Transport(e) => moodify_core::Error::Transport(e.to_string()),
            GatewayError::Protocol(msg) => moodify_core::Error::Protocol(msg),
        }
    }
}

/// Forwards a full message history to an LLM and returns the reply text.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// One request, full completion awaited, no retries.
    async fn complete(&self, messages: &[Message]) -> GatewayResult<String>;

    /// Endpoint description for logs
    fn endpoint(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Request body accepted by the relay's `/chat` route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayChatRequest {
    pub messages: Vec<Message>,
}

/// Pull `choices[0].message.content` out of a chat-completions body.
pub fn extract_content(body: &str) -> GatewayResult<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::Protocol(format!("malformed completion: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::Protocol("No choices in response".to_string()))?
        .message
        .content
        .ok_or_else(|| GatewayError::Protocol("Completion has no content".to_string()))
}

/// Read the body of a response, turning non-2xx statuses into `Upstream`.
pub(crate) async fn read_success_body(response: reqwest::Response) -> GatewayResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.text().await?)
}

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}
