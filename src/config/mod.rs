use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::summarize::{DEFAULT_MAX_WORDS, DEFAULT_MODEL};
use crate::NotesError;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini service configuration
    pub gemini: GeminiConfig,

    /// Transcript retrieval settings
    pub transcript: TranscriptConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; falls back to the GOOGLE_API_KEY environment variable
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Word budget passed to the model (not enforced locally)
    pub max_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Caption language preference, in order
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                max_words: DEFAULT_MAX_WORDS,
            },
            transcript: TranscriptConfig {
                languages: vec!["en".to_string()],
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Location of the config file, for display purposes
    pub fn path_hint() -> Result<PathBuf> {
        Self::config_path()
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("yt-notes").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.gemini.model.trim().is_empty() {
            anyhow::bail!("Gemini model must be configured");
        }

        if self.gemini.max_words == 0 {
            anyhow::bail!("gemini.max_words must be greater than zero");
        }

        if self.transcript.languages.is_empty() {
            anyhow::bail!("At least one transcript language must be configured");
        }

        Ok(())
    }

    /// Resolve the Gemini API key from the config file or the environment.
    ///
    /// Checked only when a command actually needs the generative service;
    /// resolve/transcript commands work without a key.
    pub fn resolved_api_key(&self) -> Result<String> {
        if let Some(key) = self.gemini.api_key.as_deref() {
            if !key.trim().is_empty() {
                return Ok(key.to_string());
            }
        }

        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(NotesError::ConfigError(format!(
                "no Gemini API key found (set {} or gemini.api_key in the config file)",
                API_KEY_ENV
            ))
            .into()),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Gemini Model: {}", self.gemini.model);
        println!("  Word Budget: {}", self.gemini.max_words);
        let key_source = if self.gemini.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            "config file"
        } else if std::env::var(API_KEY_ENV).is_ok() {
            "environment"
        } else {
            "not set"
        };
        println!("  API Key: {}", key_source);
        println!("  Transcript Languages: {}", self.transcript.languages.join(", "));
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
