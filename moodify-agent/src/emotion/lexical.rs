//! Rule-based lexical classifier
//!
//! Polarity masses are computed in the VADER manner, then an ordered decision
//! table picks the label. The first matching rule wins.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::lexicon::{self, NEGATION_SCALAR, NEGATION_WINDOW};
use super::{Emotion, EmotionClassifier, EmotionResult};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").unwrap());

/// Normalized polarity masses; they sum to 1 for non-empty input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PolarityScores {
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
}

impl PolarityScores {
    pub fn of(text: &str) -> Self {
        let lower = text.to_lowercase();
        let tokens = tokenize(&lower);

        let (mut pos, mut neg, mut neu) = (0.0f32, 0.0f32, 0.0f32);
        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = lexicon::valence(token) else {
                neu += 1.0;
                continue;
            };

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| lexicon::is_negator(t)) {
                valence *= NEGATION_SCALAR;
            }

            if valence > 0.0 {
                pos += valence + 1.0;
            } else if valence < 0.0 {
                neg += -valence + 1.0;
            } else {
                neu += 1.0;
            }
        }

        let total = pos + neg + neu;
        if total == 0.0 {
            return Self::default();
        }
        Self {
            positive: pos / total,
            negative: neg / total,
            neutral: neu / total,
        }
    }
}

fn tokenize(lower: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(lower).map(|m| m.as_str()).collect()
}

fn normalize_for_greeting(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let stripped = lower.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lexicon-based classifier. Deterministic, no I/O, no confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalClassifier;

impl LexicalClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Run the decision table over `text`.
    pub fn detect(&self, text: &str) -> Emotion {
        if text.trim().is_empty() {
            return Emotion::Neutral;
        }

        if lexicon::is_greeting(&normalize_for_greeting(text)) {
            return Emotion::Greeting;
        }

        let scores = PolarityScores::of(text);
        if scores.positive >= 0.5 {
            return Emotion::Joy;
        }
        if scores.neutral >= 0.8 {
            return Emotion::Neutral;
        }
        if scores.negative >= 0.5 {
            return Emotion::Anger;
        }
        if scores.negative > scores.positive && scores.negative >= 0.2 {
            return Emotion::Sadness;
        }
        if scores.neutral >= 0.5 && scores.positive > 0.0 {
            return Emotion::Calm;
        }

        let lower = text.to_lowercase();
        let tokens = tokenize(&lower);
        if tokens.iter().any(|t| lexicon::is_disgust(t)) {
            return Emotion::Disgust;
        }
        if tokens.iter().any(|t| lexicon::is_surprise(t)) {
            return Emotion::Surprise;
        }

        Emotion::Neutral
    }
}

#[async_trait]
impl EmotionClassifier for LexicalClassifier {
    async fn classify(&self, text: &str) -> EmotionResult {
        self.detect(text).into()
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}
