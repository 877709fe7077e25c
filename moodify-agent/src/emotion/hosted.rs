//! Hosted statistical classifier with lexical fallback

use std::time::Duration;

use async_trait::async_trait;
use moodify_core::config::schema::EmotionConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::lexical::LexicalClassifier;
use super::{EmotionClassifier, EmotionResult};

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// Inference APIs return either one distribution per input or a flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_distribution(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

/// Classifies through a HuggingFace-inference-compatible text-classification
/// endpoint. Any failure falls back to [`LexicalClassifier`].
pub struct HostedClassifier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    fallback: LexicalClassifier,
}

impl HostedClassifier {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            fallback: LexicalClassifier::new(),
        }
    }

    pub fn from_config(config: &EmotionConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_s),
        )
    }

    async fn query(&self, text: &str) -> moodify_core::Result<EmotionResult> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| moodify_core::Error::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| moodify_core::Error::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(moodify_core::Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InferenceResponse = serde_json::from_str(&body).map_err(|e| {
            moodify_core::Error::Protocol(format!("unexpected classifier payload: {}", e))
        })?;

        parsed
            .into_distribution()
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| EmotionResult::new(best.label, Some(best.score)))
            .ok_or_else(|| moodify_core::Error::Protocol("empty label distribution".to_string()))
    }
}

#[async_trait]
impl EmotionClassifier for HostedClassifier {
    async fn classify(&self, text: &str) -> EmotionResult {
        if text.trim().is_empty() {
            return EmotionResult::neutral();
        }

        match self.query(text).await {
            Ok(result) => {
                debug!(
                    label = %result.label,
                    confidence = ?result.confidence,
                    "Hosted classification"
                );
                result
            }
            Err(e) => {
                warn!("Hosted emotion classifier failed, using lexical fallback: {}", e);
                self.fallback.detect(text).into()
            }
        }
    }

    fn name(&self) -> &'static str {
        "hosted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn classifier(url: String) -> HostedClassifier {
        HostedClassifier::new(url, Some("hf-token".to_string()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_batched_distribution_argmax() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/model")
            .match_header("authorization", "Bearer hf-token")
            .match_body(Matcher::Json(json!({"inputs": "I can't believe it"})))
            .with_status(200)
            .with_body(
                json!([[
                    {"label": "joy", "score": 0.1},
                    {"label": "Surprise", "score": 0.8123},
                    {"label": "fear", "score": 0.0877}
                ]])
                .to_string(),
            )
            .create_async()
            .await;

        let result = classifier(format!("{}/model", server.url()))
            .classify("I can't believe it")
            .await;

        assert_eq!(result.label, "surprise");
        assert!((result.confidence.unwrap() - 0.8123).abs() < 1e-6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_flat_distribution() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/model")
            .with_status(200)
            .with_body(r#"[{"label":"sadness","score":0.6},{"label":"neutral","score":0.4}]"#)
            .create_async()
            .await;

        let result = classifier(format!("{}/model", server.url()))
            .classify("rough day")
            .await;
        assert_eq!(result.label, "sadness");
    }

    #[tokio::test]
    async fn test_upstream_error_falls_back_to_lexical() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/model")
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let result = classifier(format!("{}/model", server.url()))
            .classify("I love this")
            .await;
        assert_eq!(result.label, "joy");
        assert!(result.confidence.is_none());
    }

    #[tokio::test]
    async fn test_empty_distribution_falls_back_to_lexical() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/model")
            .with_status(200)
            .with_body("[[]]")
            .create_async()
            .await;

        let result = classifier(format!("{}/model", server.url()))
            .classify("hi")
            .await;
        assert_eq!(result.label, "greeting");
    }

    #[tokio::test]
    async fn test_unreachable_falls_back_to_lexical() {
        let result = classifier("http://127.0.0.1:1/model".to_string())
            .classify("I hate this")
            .await;
        assert_eq!(result.label, "anger");
    }

    #[tokio::test]
    async fn test_blank_text_skips_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/model")
            .expect(0)
            .create_async()
            .await;

        let result = classifier(format!("{}/model", server.url()))
            .classify("   ")
            .await;
        assert_eq!(result, EmotionResult::neutral());
        mock.assert_async().await;
    }
}
