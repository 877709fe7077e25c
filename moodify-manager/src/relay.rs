//! Relay handlers: authenticated pass-through to the LLM provider

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use moodify_providers::RelayChatRequest;
use serde_json::json;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::RelayError;
use crate::state::RelayState;

pub async fn keepalive_handler() -> Json<serde_json::Value> {
    info!("Keep-alive ping received");
    Json(json!({ "message": "Still awake 🔥" }))
}

pub async fn relay_chat_handler(State(state): State<RelayState>, body: Bytes) -> Response {
    let request: RelayChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return RelayError::BadRequest(format!("invalid request body: {}", e)).into_response()
        }
    };
    if request.messages.is_empty() {
        return RelayError::BadRequest("messages must not be empty".to_string()).into_response();
    }

    let span = info_span!(
        "relay_chat",
        request_id = %Uuid::new_v4(),
        messages = request.messages.len()
    );

    async move {
        match state.provider.forward(&request.messages).await {
            Ok(value) => Json(value).into_response(),
            Err(e) => {
                warn!("Provider call failed: {}", e);
                RelayError::from(e).into_response()
            }
        }
    }
    .instrument(span)
    .await
}
