//! Emotion classification of user messages

pub mod emoji;
pub mod hosted;
pub mod lexical;
pub mod lexicon;

pub use emoji::emoji_for;
pub use hosted::HostedClassifier;
pub use lexical::{LexicalClassifier, PolarityScores};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use moodify_core::config::schema::{EmotionConfig, EmotionStrategy};
use serde::Serialize;

/// Labels produced by the lexical classifier.
///
/// Hosted labels are free-form strings and may fall outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Disgust,
    Surprise,
    Neutral,
    Greeting,
    Calm,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
            Emotion::Greeting => "greeting",
            Emotion::Calm => "calm",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one message. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionResult {
    /// Lowercase label; hosted models may return labels outside [`Emotion`]
    pub label: String,
    /// Probability in `[0, 1]`, absent for the lexical classifier
    pub confidence: Option<f32>,
}

impl EmotionResult {
    pub fn new(label: impl Into<String>, confidence: Option<f32>) -> Self {
        Self {
            label: label.into().to_lowercase(),
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }

    pub fn neutral() -> Self {
        Emotion::Neutral.into()
    }

    pub fn emoji(&self) -> &'static str {
        emoji_for(&self.label)
    }
}

impl From<Emotion> for EmotionResult {
    fn from(emotion: Emotion) -> Self {
        Self {
            label: emotion.as_str().to_string(),
            confidence: None,
        }
    }
}

/// Maps raw user text to an emotion. Total: blank text yields neutral and
/// failures are absorbed by the implementation.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> EmotionResult;

    fn name(&self) -> &'static str;
}

/// Build the configured classifier, or `None` when classification is disabled.
pub fn classifier_from_config(config: &EmotionConfig) -> Option<Arc<dyn EmotionClassifier>> {
    if !config.enabled {
        return None;
    }
    let classifier: Arc<dyn EmotionClassifier> = match config.strategy {
        EmotionStrategy::Lexical => Arc::new(LexicalClassifier::new()),
        EmotionStrategy::Hosted => Arc::new(HostedClassifier::from_config(config)),
    };
    Some(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_lowercase_and_have_emoji() {
        assert_eq!(Emotion::Greeting.to_string(), "greeting");
        assert_eq!(serde_json::to_value(Emotion::Greeting).unwrap(), "greeting");
        assert_eq!(emoji_for(Emotion::Greeting.as_str()), "👋");
        assert_eq!(EmotionResult::new("Greeting", None).label, "greeting");
    }

    #[test]
    fn test_result_normalizes_label_and_confidence() {
        let result = EmotionResult::new("JOY", Some(1.7));
        assert_eq!(result.label, "joy");
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(result.emoji(), "😄");
    }

    #[test]
    fn test_classifier_from_config() {
        let mut config = EmotionConfig::default();
        assert_eq!(classifier_from_config(&config).unwrap().name(), "lexical");

        config.strategy = EmotionStrategy::Hosted;
        assert_eq!(classifier_from_config(&config).unwrap().name(), "hosted");

        config.enabled = false;
        assert!(classifier_from_config(&config).is_none());
    }
}
