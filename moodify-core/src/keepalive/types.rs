//! Keep-alive types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Something the keep-alive probe can ping.
#[async_trait]
pub trait LivenessTarget: Send + Sync {
    /// Issue one liveness request, returning the response body.
    async fn ping(&self) -> crate::Result<String>;

    /// Human-readable target, used in logs and status.
    fn describe(&self) -> String;
}

/// Result of the most recent ping
#[derive(Debug, Clone, Serialize)]
pub struct ProbeOutcome {
    pub at: DateTime<Utc>,
    pub ok: bool,
    /// Response body on success, error text otherwise
    pub detail: String,
}

impl ProbeOutcome {
    pub(crate) fn from_result(result: &crate::Result<String>) -> Self {
        match result {
            Ok(body) => Self {
                at: Utc::now(),
                ok: true,
                detail: body.clone(),
            },
            Err(e) => Self {
                at: Utc::now(),
                ok: false,
                detail: e.to_string(),
            },
        }
    }
}
