//! HTTP error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moodify_providers::GatewayError;
use serde::de::DeserializeOwned;
use serde_json::json;

/// Front-end request errors, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

/// Relay errors, rendered as `{"detail": ...}`
#[derive(Debug)]
pub enum RelayError {
    BadRequest(String),
    /// Provider status passed through unchanged
    Upstream { status: u16, body: String },
    Internal(String),
}

impl From<GatewayError> for RelayError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Upstream { status, body } => RelayError::Upstream { status, body },
            other => RelayError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            RelayError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            RelayError::Upstream { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
            RelayError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Decode a JSON body; an empty body or `null` yields the default value.
pub(crate) fn parse_body<T>(body: &[u8]) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice::<Option<T>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| format!("invalid request body: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ClearRequest;

    #[test]
    fn test_parse_body_optional() {
        let empty: ClearRequest = parse_body(b"").unwrap();
        assert!(empty.session_id.is_none());

        let null: ClearRequest = parse_body(b"null").unwrap();
        assert!(null.session_id.is_none());

        let parsed: ClearRequest = parse_body(br#"{"session_id":"abc"}"#).unwrap();
        assert_eq!(parsed.session_id.as_deref(), Some("abc"));

        assert!(parse_body::<ClearRequest>(b"{not json").is_err());
    }

    #[test]
    fn test_upstream_status_passes_through() {
        let response = RelayError::Upstream {
            status: 429,
            body: "slow down".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = RelayError::Upstream {
            status: 42,
            body: String::new(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
