use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::query::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::query::DEFAULT_TEMPERATURE;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Name of the database file inside the data directory
pub const DB_FILE: &str = "jingui.db";

/// Keys accepted by `jingui config`
pub static CONFIG_KEYS: &[(&str, &str)] = &[
    ("api_key", "API key for the hosted model"),
    ("model", "Model name"),
    ("base_url", "API base URL"),
    ("temperature", "Sampling temperature"),
    ("timeout_secs", "Request timeout in seconds"),
];

// -----------------------------------------------------------------------------
// Config file
// -----------------------------------------------------------------------------

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("jingui")
}

fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Read the config file; a missing or unreadable file is empty
pub fn get_config() -> HashMap<String, String> {
    let path = config_file();
    if path.exists() {
        if let Ok(content) = fs::read_to_string(&path) {
            match serde_yaml::from_str::<HashMap<String, String>>(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config"),
            }
        }
    }
    HashMap::new()
}

/// Set a config value, validating known keys
pub fn set_config(key: &str, value: &str) -> Result<(), String> {
    if !CONFIG_KEYS.iter().any(|(k, _)| *k == key) {
        return Err(format!("Unknown config key: {}", key));
    }
    match key {
        "temperature" => {
            value
                .parse::<f32>()
                .map_err(|_| format!("temperature must be a number, got: {}", value))?;
        }
        "timeout_secs" => {
            value
                .parse::<u64>()
                .map_err(|_| format!("timeout_secs must be a whole number, got: {}", value))?;
        }
        _ => {}
    }

    let dir = config_dir();
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    let mut config = get_config();
    config.insert(key.to_string(), value.to_string());

    let content =
        serde_yaml::to_string(&config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(config_file(), content).map_err(|e| format!("Failed to save config: {}", e))
}

// -----------------------------------------------------------------------------
// Resolved settings
// -----------------------------------------------------------------------------

/// Effective settings after defaults, config file and environment
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load settings from the config file and the process environment
    pub fn load() -> Self {
        let env: HashMap<String, String> = ["GEMINI_API_KEY", "API_KEY", "JINGUI_MODEL"]
            .iter()
            .filter_map(|k| std::env::var(k).ok().map(|v| (k.to_string(), v)))
            .collect();
        Self::resolve(&get_config(), &env)
    }

    /// Layer `file` values and then `env` values over the defaults
    pub fn resolve(file: &HashMap<String, String>, env: &HashMap<String, String>) -> Self {
        let mut settings = Self::default();

        if let Some(key) = file.get("api_key") {
            settings.api_key = Some(key.clone());
        }
        if let Some(model) = file.get("model") {
            settings.model = model.clone();
        }
        if let Some(url) = file.get("base_url") {
            settings.base_url = url.clone();
        }
        if let Some(t) = file.get("temperature").and_then(|t| t.parse().ok()) {
            settings.temperature = t;
        }
        if let Some(t) = file.get("timeout_secs").and_then(|t| t.parse().ok()) {
            settings.timeout_secs = t;
        }

        if let Some(key) = env.get("GEMINI_API_KEY").or_else(|| env.get("API_KEY")) {
            settings.api_key = Some(key.clone());
        }
        if let Some(model) = env.get("JINGUI_MODEL") {
            settings.model = model.clone();
        }

        settings
    }

    /// Value of a config key for display, with the API key masked
    pub fn display_value(&self, key: &str) -> Option<String> {
        match key {
            "api_key" => Some(
                self.api_key
                    .as_deref()
                    .map(mask_secret)
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            "model" => Some(self.model.clone()),
            "base_url" => Some(self.base_url.clone()),
            "temperature" => Some(self.temperature.to_string()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

// -----------------------------------------------------------------------------
// Data directory
// -----------------------------------------------------------------------------

/// Directory holding the database: `JINGUI_PATH`, else the platform data dir
pub fn data_path() -> PathBuf {
    if let Ok(path) = std::env::var("JINGUI_PATH") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jingui")
}
