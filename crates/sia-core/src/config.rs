use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::DEFAULT_MAX_ATTEMPTS;
use crate::timeline::DEFAULT_ESCALATION_THRESHOLD_HOURS;

const CONFIG_FILE_PATH: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    /// Set for Azure OpenAI deployments, e.g. "2024-02-15-preview"
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default)]
    pub retry_delay_ms: u64,
    #[serde(default = "default_escalation_threshold_hours")]
    pub escalation_threshold_hours: u32,
    #[serde(default = "default_llm_enabled")]
    pub llm_enabled: bool,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_escalation_threshold_hours() -> u32 {
    DEFAULT_ESCALATION_THRESHOLD_HOURS
}

fn default_llm_enabled() -> bool {
    true
}

pub fn sia_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".sia")
}

fn sia_config_json_path() -> PathBuf {
    sia_dir().join("config.json")
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            api_version: None,
            model: None,
            max_retries: default_max_retries(),
            retry_delay_ms: 0,
            escalation_threshold_hours: default_escalation_threshold_hours(),
            llm_enabled: default_llm_enabled(),
        }
    }
}

impl Config {
    /// Best-effort load: `~/.sia/config.json`, else `./config.toml`, then
    /// environment overrides. Unreadable files fall back to defaults.
    pub fn new() -> Self {
        let mut config = [sia_config_json_path(), PathBuf::from(CONFIG_FILE_PATH)]
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Ignoring config at {:?}: {}", path, e);
                    None
                }
            })
            .unwrap_or_default();

        if let Err(e) = config.apply_overrides(|key| std::env::var(key).ok()) {
            log::warn!("Ignoring environment override: {}", e);
        }
        config
    }

    /// Read a `.json` or `.toml` config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Apply overrides from a key lookup, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("API_KEY") {
            self.api_key = Some(api_key);
        }
        if let Some(api_base) = lookup("API_BASE") {
            self.api_base = Some(api_base);
        }
        if let Some(api_version) = lookup("API_VERSION") {
            self.api_version = Some(api_version);
        }
        if let Some(model) = lookup("MODEL") {
            self.model = Some(model);
        }
        if let Some(value) = lookup("SIA_MAX_RETRIES") {
            self.max_retries = parse_number("SIA_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("SIA_RETRY_DELAY_MS") {
            self.retry_delay_ms = parse_number("SIA_RETRY_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("SIA_ESCALATION_HOURS") {
            self.escalation_threshold_hours = parse_number("SIA_ESCALATION_HOURS", &value)?;
        }
        if let Some(value) = lookup("SIA_LLM_ENABLED") {
            self.llm_enabled = parse_bool_env(&value);
        }
        Ok(())
    }

    /// A completer is only worth building with both a key and an endpoint.
    pub fn llm_configured(&self) -> bool {
        self.llm_enabled
            && self.api_key.as_deref().map_or(false, |k| !k.trim().is_empty())
            && self.api_base.as_deref().map_or(false, |b| !b.trim().is_empty())
    }
}
