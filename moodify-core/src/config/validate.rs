//! Configuration validation rules.

use super::schema::{Config, EmotionStrategy};

/// Validate configuration and return aggregated validation errors.
///
/// The provider API key is not checked here: only the relay and the
/// direct gateway mode need it, see [`Config::provider_api_key`].
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.conversation.history_cap == 0 {
        errors.push("conversation.history_cap must be > 0".to_string());
    }
    if config.conversation.default_session_id.trim().is_empty() {
        errors.push("conversation.default_session_id must not be empty".to_string());
    }

    if config.relay.provider_url.trim().is_empty() {
        errors.push("relay.provider_url must not be empty".to_string());
    }
    if config.relay.model.trim().is_empty() {
        errors.push("relay.model must not be empty".to_string());
    }
    if config.relay.max_tokens == 0 {
        errors.push("relay.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.relay.temperature) {
        errors.push("relay.temperature must be in [0.0, 2.0]".to_string());
    }
    if !(config.relay.top_p > 0.0 && config.relay.top_p <= 1.0) {
        errors.push("relay.top_p must be in (0.0, 1.0]".to_string());
    }
    if config.relay.timeout_s == 0 {
        errors.push("relay.timeout_s must be > 0".to_string());
    }

    if config.gateway.base_url.trim().is_empty() {
        errors.push("gateway.base_url must not be empty".to_string());
    }
    if config.gateway.timeout_s == 0 {
        errors.push("gateway.timeout_s must be > 0".to_string());
    }

    if config.emotion.enabled && config.emotion.strategy == EmotionStrategy::Hosted {
        if config.emotion.endpoint.trim().is_empty() {
            errors.push(
                "emotion.endpoint is required when the hosted strategy is used".to_string(),
            );
        }
        if config.emotion.timeout_s == 0 {
            errors.push("emotion.timeout_s must be > 0".to_string());
        }
    }

    if config.keepalive.enabled && config.keepalive.interval_s == 0 {
        errors.push("keepalive.interval_s must be > 0 when keepalive is enabled".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}
