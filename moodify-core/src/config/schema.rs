//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for moodify
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat front-end listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion relay (pass-through to the LLM provider)
    #[serde(default)]
    pub relay: RelayConfig,
    /// How the front-end reaches the completion endpoint
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Conversation policy
    #[serde(default)]
    pub conversation: ConversationConfig,
    /// Emotion classification
    #[serde(default)]
    pub emotion: EmotionConfig,
    /// Upstream keep-alive probe
    #[serde(default)]
    pub keepalive: KeepAliveConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// The provider API key, or a configuration error when it is unset.
    ///
    /// Required by the relay and by the front-end in direct gateway mode.
    pub fn provider_api_key(&self) -> crate::Result<&str> {
        let key = self.relay.api_key.trim();
        if key.is_empty() {
            return Err(crate::Error::Config(
                "relay.api_key is required (set API_KEY or MOODIFY__RELAY__API_KEY)".to_string(),
            ));
        }
        Ok(key)
    }

    /// URL the keep-alive probe should ping.
    pub fn keepalive_url(&self) -> String {
        match &self.keepalive.url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => format!("{}/keepalive", self.gateway.base_url.trim_end_matches('/')),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

/// Chat front-end listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_server_port(),
        }
    }
}

/// Completion relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_bind_host")]
    pub host: String,
    #[serde(default = "default_relay_port")]
    pub port: u16,
    /// OpenAI-compatible chat-completions URL of the LLM provider
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Provider API key (secret)
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bound on generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Provider request timeout in seconds
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

fn default_relay_port() -> u16 {
    8000
}

fn default_provider_url() -> String {
    "https://api.deepinfra.com/v1/openai/chat/completions".to_string()
}

fn default_model() -> String {
    "meta-llama/Llama-3.3-70B-Instruct-Turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.6
}

fn default_top_p() -> f32 {
    0.8
}

fn default_timeout_s() -> u64 {
    60
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_relay_port(),
            provider_url: default_provider_url(),
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_s: default_timeout_s(),
        }
    }
}

/// Which completion endpoint the front-end talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// Through the moodify relay (`POST {base_url}/chat`)
    #[default]
    Relay,
    /// Straight to the LLM provider using the `relay` provider settings
    Direct,
}

/// Front-end gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub mode: GatewayMode,
    /// Base URL of the relay
    #[serde(default = "default_relay_base_url")]
    pub base_url: String,
    /// Optional bearer token sent to the relay
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
}

fn default_relay_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            base_url: default_relay_base_url(),
            auth_token: None,
            timeout_s: default_timeout_s(),
        }
    }
}

/// System prompt policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Prompt embeds the detected emotion and is rebuilt every turn
    #[default]
    Reactive,
    /// Fixed companion persona, emotion-agnostic
    Persona,
}

/// What `clear` does to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClearPolicy {
    /// Drop the session entirely
    #[default]
    Remove,
    /// Keep the session with a system-only history
    Reset,
}

/// Conversation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Maximum retained non-system messages per session
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    #[serde(default)]
    pub prompt_mode: PromptMode,
    #[serde(default)]
    pub clear_policy: ClearPolicy,
    /// Session id used when the caller supplies none
    #[serde(default = "default_session_id")]
    pub default_session_id: String,
}

fn default_history_cap() -> usize {
    10
}

fn default_session_id() -> String {
    "default".to_string()
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_cap: default_history_cap(),
            prompt_mode: PromptMode::default(),
            clear_policy: ClearPolicy::default(),
            default_session_id: default_session_id(),
        }
    }
}

/// Emotion classifier strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionStrategy {
    /// Built-in lexicon and decision table
    #[default]
    Lexical,
    /// Hosted text-classification model, lexical fallback on failure
    Hosted,
}

/// Emotion classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub strategy: EmotionStrategy,
    /// Inference endpoint for the hosted strategy
    #[serde(default = "default_emotion_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_emotion_timeout_s")]
    pub timeout_s: u64,
}

fn default_true() -> bool {
    true
}

fn default_emotion_endpoint() -> String {
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base"
        .to_string()
}

fn default_emotion_timeout_s() -> u64 {
    10
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: EmotionStrategy::default(),
            endpoint: default_emotion_endpoint(),
            api_key: None,
            timeout_s: default_emotion_timeout_s(),
        }
    }
}

/// Default keep-alive interval: 10 minutes (in seconds)
pub const DEFAULT_KEEPALIVE_INTERVAL_S: u64 = 10 * 60;

/// Keep-alive probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepAliveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_keepalive_interval")]
    pub interval_s: u64,
    /// Liveness URL; defaults to `{gateway.base_url}/keepalive`
    #[serde(default)]
    pub url: Option<String>,
}

fn default_keepalive_interval() -> u64 {
    DEFAULT_KEEPALIVE_INTERVAL_S
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_s: DEFAULT_KEEPALIVE_INTERVAL_S,
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.conversation.history_cap, 10);
        assert_eq!(config.keepalive.interval_s, 600);
        assert_eq!(config.relay.max_tokens, 150);
        assert!((config.relay.temperature - 0.6).abs() < f32::EPSILON);
        assert!((config.relay.top_p - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.conversation.default_session_id, "default");
    }

    #[test]
    fn test_enums_deserialize_lowercase() {
        let config: ConversationConfig =
            serde_json::from_str(r#"{"prompt_mode":"persona","clear_policy":"reset"}"#).unwrap();
        assert_eq!(config.prompt_mode, PromptMode::Persona);
        assert_eq!(config.clear_policy, ClearPolicy::Reset);
        assert_eq!(config.history_cap, 10);
    }

    #[test]
    fn test_provider_api_key_required() {
        let mut config = Config::default();
        let err = config.provider_api_key().unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        config.relay.api_key = "  sk-test  ".to_string();
        assert_eq!(config.provider_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_keepalive_url_defaults_to_gateway_base() {
        let mut config = Config::default();
        config.gateway.base_url = "https://relay.example.com/".to_string();
        assert_eq!(config.keepalive_url(), "https://relay.example.com/keepalive");

        config.keepalive.url = Some("https://other.example.com/ping".to_string());
        assert_eq!(config.keepalive_url(), "https://other.example.com/ping");
    }
}
