use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Generation service API key; the GEMINI_API_KEY environment variable
    /// takes precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_tts_model")]
    pub tts_model: String,
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}
fn default_tts_voice() -> String {
    "Kore".to_string()
}
fn default_request_timeout_secs() -> u64 {
    90
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            model: default_model(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
            request_timeout_secs: default_request_timeout_secs(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write a config scaffold on first run so the user has a file to put the
    /// API key in. Never overwrites an existing config.
    pub fn ensure_saved(&self) -> Result<()> {
        if Self::config_path().exists() {
            return Ok(());
        }
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simulado")
            .join("config.toml")
    }

    /// Effective API key: environment first, config file second.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_fills_every_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, default_model());
        assert_eq!(config.tts_voice, "Kore");
        assert_eq!(config.request_timeout_secs, 90);
        assert!(config.api_base_url.starts_with("https://"));
    }

    #[test]
    fn partial_file_keeps_known_fields() {
        let config: Config = toml::from_str(
            r#"
model = "gemini-other"
theme = "terminal-default"
"#,
        )
        .unwrap();
        assert_eq!(config.model, "gemini-other");
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.tts_model, default_tts_model());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.api_key = Some("k".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api_key.as_deref(), Some("k"));
        assert_eq!(deserialized.model, config.model);
    }
}
