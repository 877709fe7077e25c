//! Client for the moodify relay, used by the chat front-end

use std::time::Duration;

use async_trait::async_trait;
use moodify_core::config::schema::GatewayConfig;
use moodify_core::keepalive::LivenessTarget;
use moodify_core::session::Message;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::base::{
    build_http_client, extract_content, read_success_body, CompletionGateway, GatewayResult,
};

#[derive(Serialize)]
struct RelayRequest<'a> {
    messages: &'a [Message],
}

/// Talks to `POST {base_url}/chat` and `GET {base_url}/keepalive`.
pub struct RelayClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    keepalive_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let keepalive_url = format!("{}/keepalive", base_url);
        Self {
            client: build_http_client(timeout),
            base_url,
            auth_token: auth_token.filter(|t| !t.trim().is_empty()),
            keepalive_url,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.auth_token.clone(),
            Duration::from_secs(config.timeout_s),
        )
    }

    /// Ping a different liveness URL than `{base_url}/keepalive`.
    pub fn with_keepalive_url(mut self, url: impl Into<String>) -> Self {
        self.keepalive_url = url.into();
        self
    }

    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.auth_token {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", token));
        }
        req_builder
    }
}

#[async_trait]
impl CompletionGateway for RelayClient {
    async fn complete(&self, messages: &[Message]) -> GatewayResult<String> {
        debug!(
            "Sending {} messages to relay {}",
            messages.len(),
            self.chat_url()
        );

        let request = RelayRequest { messages };
        let response = self
            .apply_headers(self.client.post(self.chat_url()).json(&request))
            .send()
            .await?;

        let body = read_success_body(response).await?;
        extract_content(&body)
    }

    fn endpoint(&self) -> String {
        self.chat_url()
    }
}

#[async_trait]
impl LivenessTarget for RelayClient {
    async fn ping(&self) -> moodify_core::Result<String> {
        let response = self
            .apply_headers(self.client.get(&self.keepalive_url))
            .send()
            .await
            .map_err(|e| moodify_core::Error::Transport(e.to_string()))?;
        Ok(read_success_body(response).await?)
    }

    fn describe(&self) -> String {
        self.keepalive_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::GatewayError;
    use mockito::Matcher;
    use serde_json::json;

    fn client(url: &str, token: Option<&str>) -> RelayClient {
        RelayClient::new(url, token.map(String::from), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_complete_posts_history_and_reads_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("authorization", "Bearer relay-token")
            .match_body(Matcher::Json(json!({
                "messages": [
                    {"role": "system", "content": "be warm"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hey! 👋"}}]}"#)
            .create_async()
            .await;

        let relay = client(&server.url(), Some("relay-token"));
        let reply = relay
            .complete(&[Message::system("be warm"), Message::user("hello")])
            .await
            .unwrap();

        assert_eq!(reply, "Hey! 👋");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_without_token_sends_no_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let relay = client(&format!("{}/", server.url()), None);
        assert_eq!(relay.complete(&[Message::user("hi")]).await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_upstream_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat")
            .with_status(503)
            .with_body(r#"{"detail":"provider down"}"#)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();

        match err {
            GatewayError::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("provider down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_malformed_payload_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        let err = client(&server.url(), None)
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_complete_unreachable_is_transport_error() {
        let err = client("http://127.0.0.1:1", None)
            .complete(&[Message::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_ping_hits_keepalive() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/keepalive")
            .with_status(200)
            .with_body(r#"{"message":"Still awake 🔥"}"#)
            .create_async()
            .await;

        let relay = client(&server.url(), None);
        assert_eq!(relay.describe(), format!("{}/keepalive", server.url()));
        let body = relay.ping().await.unwrap();
        assert!(body.contains("Still awake"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ping_failure_is_core_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/healthz")
            .with_status(500)
            .create_async()
            .await;

        let relay =
            client(&server.url(), None).with_keepalive_url(format!("{}/healthz", server.url()));
        let err = relay.ping().await.unwrap_err();
        assert!(matches!(err, moodify_core::Error::Upstream { status: 500, .. }));

        let err = client("http://127.0.0.1:1", None).ping().await.unwrap_err();
        assert!(matches!(err, moodify_core::Error::Transport(_)));
    }
}
