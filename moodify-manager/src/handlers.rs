use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::error::{parse_body, ApiError};
use crate::state::{
    AppState, ChatFailureResponse, ChatRequest, ClearRequest, StartChatRequest,
    StartChatResponse, StatusResponse,
};

pub async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: ChatRequest = match parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => return ApiError::BadRequest(e).into_response(),
    };
    if payload.message.trim().is_empty() {
        return ApiError::BadRequest("message must not be empty".to_string()).into_response();
    }

    let orchestrator = state.orchestrator;
    let session_id = orchestrator.resolve_session_id(payload.session_id.as_deref());
    let span = info_span!("chat", request_id = %Uuid::new_v4(), session_id = %session_id);

    async move {
        match orchestrator
            .handle_chat(Some(&session_id), &payload.message)
            .await
        {
            Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
            Err(failure) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatFailureResponse {
                    response: failure.apology(),
                }),
            )
                .into_response(),
        }
    }
    .instrument(span)
    .await
}

pub async fn clear_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: ClearRequest = match parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => return ApiError::BadRequest(e).into_response(),
    };

    state
        .orchestrator
        .clear(payload.session_id.as_deref())
        .await;
    Json(StatusResponse { status: "success" }).into_response()
}

pub async fn start_chat_handler(body: Bytes) -> Response {
    let payload: StartChatRequest = match parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => return ApiError::BadRequest(e).into_response(),
    };

    tracing::debug!(start = ?payload.start, "Chat start signal");
    Json(StartChatResponse {
        status: "acknowledged",
        start: payload.start,
    })
    .into_response()
}
