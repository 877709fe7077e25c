//! Word lists for the lexical classifier
//!
//! Valences use the VADER scale (-4 very negative to +4 very positive).

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Applied to a valence when a negator appears within the preceding window.
pub const NEGATION_SCALAR: f32 = -0.74;

/// How many preceding tokens are checked for a negator.
pub const NEGATION_WINDOW: usize = 3;

#[rustfmt::skip]
const VALENCES: &[(&str, f32)] = &[
    // positive
    ("amazing", 2.8), ("awesome", 3.1), ("beautiful", 2.9), ("best", 3.2),
    ("better", 1.9), ("blessed", 2.9), ("brilliant", 2.8), ("calm", 1.3),
    ("cheerful", 2.5), ("comfortable", 1.5), ("confident", 2.2), ("cool", 1.3),
    ("delighted", 3.2), ("enjoy", 2.2), ("enjoyed", 2.3), ("excellent", 3.2),
    ("excited", 2.5), ("exciting", 2.2), ("fantastic", 2.6), ("fine", 0.8),
    ("fun", 2.3), ("glad", 2.0), ("good", 1.9), ("grateful", 2.3),
    ("great", 3.1), ("happy", 2.7), ("hope", 1.9), ("hopeful", 2.3),
    ("joy", 2.8), ("kind", 2.4), ("laugh", 2.6), ("like", 1.5),
    ("love", 3.2), ("loved", 2.9), ("lovely", 2.8), ("lucky", 1.8),
    ("nice", 1.8), ("okay", 0.9), ("ok", 0.9), ("peaceful", 2.2),
    ("perfect", 2.7), ("pleased", 2.2), ("proud", 2.1), ("relaxed", 2.2),
    ("relieved", 1.5), ("smile", 1.5), ("success", 2.7), ("super", 2.9),
    ("thank", 1.5), ("thanks", 1.9), ("thankful", 2.7), ("win", 2.8),
    ("wonderful", 2.7), ("yay", 2.4),
    // negative
    ("afraid", -2.2), ("alone", -1.0), ("angry", -2.3), ("annoyed", -1.6),
    ("annoying", -1.7), ("anxious", -1.0), ("ashamed", -2.1), ("awful", -2.0),
    ("bad", -2.5), ("boring", -1.3), ("broken", -2.1), ("cry", -2.1),
    ("crying", -2.1), ("depressed", -2.3), ("disappointed", -1.9), ("disgusting", -2.4),
    ("fail", -2.5), ("failed", -2.3), ("fear", -2.2), ("frustrated", -2.4),
    ("furious", -2.7), ("gross", -2.1), ("grief", -2.2), ("hate", -2.7),
    ("hated", -3.2), ("horrible", -2.5), ("hurt", -2.4), ("lonely", -1.5),
    ("lost", -1.3), ("mad", -2.2), ("miserable", -2.2), ("nasty", -2.6),
    ("nervous", -1.1), ("pain", -2.3), ("rage", -2.6), ("sad", -2.1),
    ("scared", -1.9), ("sick", -2.3), ("sorry", -0.3), ("stress", -1.8),
    ("stressed", -1.4), ("stupid", -2.4), ("terrible", -2.5), ("tired", -1.9),
    ("ugly", -2.3), ("unhappy", -1.8), ("upset", -1.6), ("worried", -1.2),
    ("worse", -2.1), ("worst", -3.1), ("worthless", -1.9), ("wrong", -2.1),
];

#[rustfmt::skip]
const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "neither", "nor",
    "cannot", "cant", "can't", "dont", "don't", "doesnt", "doesn't",
    "didnt", "didn't", "isnt", "isn't", "wasnt", "wasn't", "arent", "aren't",
    "wont", "won't", "wouldnt", "wouldn't", "shouldnt", "shouldn't",
    "aint", "ain't", "without",
];

#[rustfmt::skip]
const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "hiya", "howdy", "yo", "sup", "greetings",
    "hi there", "hello there", "hey there", "good morning", "good afternoon",
    "good evening", "what's up", "whats up",
];

#[rustfmt::skip]
const DISGUST_WORDS: &[&str] = &[
    "disgusting", "disgusted", "gross", "ew", "eww", "yuck", "nasty",
    "revolting", "vile", "sickening", "nauseating",
];

#[rustfmt::skip]
const SURPRISE_WORDS: &[&str] = &[
    "wow", "whoa", "woah", "omg", "unexpected", "surprised", "surprising",
    "shocked", "shocking", "unbelievable", "astonished",
];

pub static LEXICON: Lazy<HashMap<&'static str, f32>> =
    Lazy::new(|| VALENCES.iter().copied().collect());

static NEGATOR_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| NEGATORS.iter().copied().collect());
static GREETING_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| GREETINGS.iter().copied().collect());
static DISGUST_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DISGUST_WORDS.iter().copied().collect());
static SURPRISE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| SURPRISE_WORDS.iter().copied().collect());

pub fn valence(token: &str) -> Option<f32> {
    LEXICON.get(token).copied()
}

pub fn is_negator(token: &str) -> bool {
    NEGATOR_SET.contains(token)
}

/// `normalized` is lowercase with trailing punctuation removed.
pub fn is_greeting(normalized: &str) -> bool {
    GREETING_SET.contains(normalized)
}

pub fn is_disgust(token: &str) -> bool {
    DISGUST_SET.contains(token)
}

pub fn is_surprise(token: &str) -> bool {
    SURPRISE_SET.contains(token)
}
