//! Completion gateways for moodify
//!
//! The chat front-end reaches the LLM either through the moodify relay
//! ([`RelayClient`]) or straight at the provider ([`ProviderClient`]); both
//! sit behind the [`CompletionGateway`] trait.

pub mod base;
pub mod provider;
pub mod relay;

pub use base::{extract_content, CompletionGateway, GatewayError, GatewayResult, RelayChatRequest};
pub use provider::{DecodingParams, ProviderClient};
pub use relay::RelayClient;

use std::sync::Arc;

use moodify_core::config::schema::{Config, GatewayMode};

/// Build the front-end's gateway for the configured mode.
///
/// Direct mode needs the provider API key and fails fast without it.
pub fn gateway_from_config(config: &Config) -> moodify_core::Result<Arc<dyn CompletionGateway>> {
    match config.gateway.mode {
        GatewayMode::Relay => Ok(Arc::new(RelayClient::from_config(&config.gateway))),
        GatewayMode::Direct => Ok(Arc::new(ProviderClient::from_config(&config.relay)?)),
    }
}
