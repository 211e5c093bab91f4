//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const GEMINI_KEY_ENV: &str = "RESUMOTUBE_GEMINI_API_KEY";
const OPENAI_KEY_ENV: &str = "RESUMOTUBE_OPENAI_API_KEY";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Provider API keys
    #[serde(default)]
    pub credentials: Credentials,
}

/// API keys for the summary providers. An empty key means "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Google Gemini API key
    #[serde(default)]
    pub gemini_api_key: String,

    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: String,
}

impl Credentials {
    pub fn gemini_key(&self) -> Option<&str> {
        non_empty(&self.gemini_api_key)
    }

    pub fn openai_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn mask(value: &str) -> String {
    match non_empty(value) {
        None => String::new(),
        Some(key) if key.chars().count() <= 8 => "********".to_string(),
        Some(key) => {
            let tail: String = key.chars().skip(key.chars().count() - 4).collect();
            format!("********{}", tail)
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load settings from an explicit path, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Fill empty keys from `lookup`; keys already stored in the file win.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let slots = [
            (&mut self.credentials.gemini_api_key, GEMINI_KEY_ENV),
            (&mut self.credentials.openai_api_key, OPENAI_KEY_ENV),
        ];

        for (slot, env_name) in slots {
            if !slot.trim().is_empty() {
                continue;
            }
            if let Some(key) = lookup(env_name) {
                if !key.trim().is_empty() {
                    *slot = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "resumotube", "resumotube")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        Self::default().save_to(path)
    }

    /// Persist these settings as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Set a single configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "credentials.gemini_api_key" | "gemini_api_key" => {
                self.credentials.gemini_api_key = value.trim().to_string();
            }
            "credentials.openai_api_key" | "openai_api_key" => {
                self.credentials.openai_api_key = value.trim().to_string();
            }
            other => anyhow::bail!(
                "Unknown config key '{}'. Supported keys: credentials.gemini_api_key, credentials.openai_api_key",
                other
            ),
        }
        Ok(())
    }

    /// Copy of these settings with the API keys masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            credentials: Credentials {
                gemini_api_key: mask(&self.credentials.gemini_api_key),
                openai_api_key: mask(&self.credentials.openai_api_key),
            },
        }
    }
}
