use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot find home directory")]
    NoHomeDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Config file already exists at: {0}. Please edit it directly.")]
    AlreadyExists(PathBuf),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub widget: WidgetSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings owned by the documentation site hosting the widget.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Backend origin; blank means "not configured".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default = "SiteConfig::default_title")]
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            title: Self::default_title(),
        }
    }
}

impl SiteConfig {
    fn default_title() -> String {
        "Book Assistant".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WidgetSettings {
    #[serde(default = "WidgetSettings::default_greeting")]
    pub greeting: String,
    #[serde(default = "WidgetSettings::default_fallback_message")]
    pub fallback_message: String,
    #[serde(default = "WidgetSettings::default_placeholder")]
    pub placeholder: String,
    #[serde(default = "WidgetSettings::default_start_open")]
    pub start_open: bool,
    #[serde(default = "WidgetSettings::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            greeting: Self::default_greeting(),
            fallback_message: Self::default_fallback_message(),
            placeholder: Self::default_placeholder(),
            start_open: Self::default_start_open(),
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

impl WidgetSettings {
    fn default_greeting() -> String {
        "Hello! I'm your book assistant. Ask me anything about the book content!".to_string()
    }

    fn default_fallback_message() -> String {
        "Sorry, I encountered an error processing your question. Please try again.".to_string()
    }

    fn default_placeholder() -> String {
        "Ask a question about the book...".to_string()
    }

    const fn default_start_open() -> bool {
        false
    }

    const fn default_request_timeout_secs() -> u64 {
        30
    }

    /// Zero is treated as one second; an unbounded wait is not offered.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `bookchat=debug`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        Ok(dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join("bookchat"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/bookchat/config.json`, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "No config file at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the template to `~/bookchat/config.json`.
    pub fn create_config() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path()?;
        Self::create_config_at(&path)?;
        Ok(path)
    }

    pub fn create_config_at(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        let config_template = r#"{
  "site": {
    "api_base_url": "http://localhost:8000",
    "title": "Book Assistant"
  },
  "widget": {
    "greeting": "Hello! I'm your book assistant. Ask me anything about the book content!",
    "fallback_message": "Sorry, I encountered an error processing your question. Please try again.",
    "placeholder": "Ask a question about the book...",
    "start_open": false,
    "request_timeout_secs": 30
  },
  "logging": {
    "level": "info"
  }
}
"#;

        std::fs::write(path, config_template).map_err(write_err)?;
        info!("Created config file at {}", path.display());
        Ok(())
    }
}
