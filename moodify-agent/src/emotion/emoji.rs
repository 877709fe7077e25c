//! Emotion label to emoji lookup

const EMOJI_MAP: &[(&str, &str)] = &[
    ("joy", "😄"),
    ("gratitude", "😊"),
    ("sadness", "😔"),
    ("anger", "😠"),
    ("fear", "😟"),
    ("confusion", "😕"),
    ("disgust", "🤢"),
    ("surprise", "😲"),
    ("neutral", "😌"),
    ("greeting", "👋"),
    ("calm", "🙂"),
];

/// Case-insensitive; unknown labels map to the empty string.
pub fn emoji_for(label: &str) -> &'static str {
    let label = label.trim();
    EMOJI_MAP
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, glyph)| *glyph)
        .unwrap_or("")
}
