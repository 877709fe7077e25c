//! Client for the LLM provider's OpenAI-compatible chat-completions API

use std::time::Duration;

use async_trait::async_trait;
use moodify_core::config::schema::RelayConfig;
use moodify_core::session::Message;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::base::{
    build_http_client, extract_content, read_success_body, CompletionGateway, GatewayError,
    GatewayResult,
};

/// Fixed decoding parameters attached to every provider request
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl From<&RelayConfig> for DecodingParams {
    fn from(config: &RelayConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

#[derive(Serialize)]
struct ProviderRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

/// Authenticated provider client used by the relay, and by the front-end in
/// direct gateway mode.
pub struct ProviderClient {
    client: Client,
    url: String,
    api_key: String,
    params: DecodingParams,
}

impl ProviderClient {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        params: DecodingParams,
        timeout: Duration,
    ) -> Self {
        Self {
            client: build_http_client(timeout),
            url: url.into(),
            api_key: api_key.into(),
            params,
        }
    }

    /// Build from relay settings; fails when no API key is configured.
    pub fn from_config(config: &RelayConfig) -> moodify_core::Result<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(moodify_core::Error::Config(
                "relay.api_key is required (set API_KEY or MOODIFY__RELAY__API_KEY)".to_string(),
            ));
        }
        Ok(Self::new(
            config.provider_url.clone(),
            api_key,
            DecodingParams::from(config),
            Duration::from_secs(config.timeout_s),
        ))
    }

    pub fn params(&self) -> &DecodingParams {
        &self.params
    }

    /// Forward a conversation and return the provider's JSON untouched.
    pub async fn forward(&self, messages: &[Message]) -> GatewayResult<serde_json::Value> {
        let request = ProviderRequest {
            model: &self.params.model,
            messages,
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            top_p: self.params.top_p,
        };

        debug!(
            "Sending chat request to {} with model {}",
            self.url, self.params.model
        );

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Protocol(format!("provider returned invalid JSON: {}", e)))
    }
}

#[async_trait]
impl CompletionGateway for ProviderClient {
    async fn complete(&self, messages: &[Message]) -> GatewayResult<String> {
        let value = self.forward(messages).await?;
        extract_content(&value.to_string())
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}
