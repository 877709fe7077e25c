//! Configuration loading and management

use super::schema::Config;
use super::validate::validate_config;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new config loader with the default config directory
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .map(|h| h.join(".moodify"))
            .unwrap_or_else(|| PathBuf::from(".moodify"));

        Self { config_dir }
    }

    /// Create a new config loader with a custom config directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file and environment
    pub fn load(&self) -> crate::Result<Config> {
        let config_path = self.config_path();
        let mut merged = serde_json::to_value(Config::default())?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let file_value: Value = serde_json::from_str(&content)?;
            merge_values(&mut merged, file_value);
        }

        apply_alias_overrides(&mut merged);
        apply_path_overrides(&mut merged);

        let config: Config = serde_json::from_value(merged)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Path of the JSON config file
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(&key) {
                    merge_values(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn parse_env_value(raw: &str) -> Value {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        return v;
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Value::Number(v.into());
    }
    if let Ok(v) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(v) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn set_path_value(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(last.clone(), value);
    }
}

/// Secrets stay strings; ports and URLs go through the usual value parsing.
fn apply_alias_overrides(config: &mut Value) {
    let aliases = [
        ("API_KEY", "relay.api_key", false),
        ("MOODIFY_API_KEY", "relay.api_key", false),
        ("PORT", "server.port", true),
        ("RELAY_URL", "gateway.base_url", false),
    ];

    for (env_key, target_path, parse) in aliases {
        if let Ok(value) = std::env::var(env_key) {
            let path: Vec<String> = target_path.split('.').map(ToString::to_string).collect();
            let value = if parse {
                parse_env_value(&value)
            } else {
                Value::String(value)
            };
            set_path_value(config, &path, value);
        }
    }
}

fn apply_path_overrides(config: &mut Value) {
    const PREFIX: &str = "MOODIFY__";
    for (key, value) in std::env::vars() {
        let Some(suffix) = key.strip_prefix(PREFIX) else {
            continue;
        };
        let segments: Vec<String> = suffix
            .split("__")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if segments.is_empty() {
            continue;
        }
        // Secrets must not be coerced into numbers.
        let is_secret = segments
            .last()
            .is_some_and(|s| s.ends_with("api_key") || s == "auth_token");
        let parsed = if is_secret {
            Value::String(value)
        } else {
            parse_env_value(&value)
        };
        set_path_value(config, &segments, parsed);
    }
}
