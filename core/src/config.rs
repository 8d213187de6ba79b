//! Configuration Management Module
//!
//! File-based configuration (TOML, JSON or YAML) with environment variable
//! overrides. The feedback service credential is the only required value.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::llm::transport_reqwest::DEFAULT_TIMEOUT_SECS;
use crate::session::{ResetScope, SessionSettings};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "reflect.toml";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{variable} not found. Please set it in your environment or configuration file.")]
    MissingCredential { variable: &'static str },

    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse {format} config: {message}")]
    Parse { format: String, message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Configuration file format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    Json,
    #[default]
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default()
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
        }
    }
}

impl std::str::FromStr for ConfigFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(ConfigError::Invalid {
                key: "format".to_string(),
                message: format!("Unsupported config format: {}", s),
            }),
        }
    }
}

/// Which feedback service backs the sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackProvider {
    #[default]
    Gemini,
    Stub,
}

impl std::str::FromStr for FeedbackProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(FeedbackProvider::Gemini),
            "stub" => Ok(FeedbackProvider::Stub),
            other => Err(ConfigError::Invalid {
                key: "feedback.provider".to_string(),
                message: format!("Unknown provider: {}", other),
            }),
        }
    }
}

/// `[feedback]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub provider: FeedbackProvider,
    /// Literal key, or `env:NAME` to read it from the environment
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_seconds: u64,
    /// Canned answer for the stub provider
    pub stub_response: Option<String>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            provider: FeedbackProvider::Gemini,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            stub_response: None,
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are discarded
    pub session_idle_secs: u64,
    /// Upper bound on live sessions; the least recently used one is evicted
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            session_idle_secs: 30 * 60,
            max_sessions: 10_000,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub feedback: FeedbackConfig,
    pub session: SessionSettings,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Fail fast when the selected provider has no credential
    pub fn require_credential(&self) -> Result<(), ConfigError> {
        match self.feedback.provider {
            FeedbackProvider::Stub => Ok(()),
            FeedbackProvider::Gemini => {
                let present = self
                    .feedback
                    .api_key
                    .as_deref()
                    .map(|key| !key.trim().is_empty() && !key.starts_with("env:"))
                    .unwrap_or(false);
                if present {
                    Ok(())
                } else {
                    Err(ConfigError::MissingCredential {
                        variable: API_KEY_ENV,
                    })
                }
            }
        }
    }
}

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: Option<PathBuf>,
    config: AppConfig,
}

impl ConfigManager {
    /// Load configuration from `explicit` or the default search paths, then
    /// apply overrides from the process environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut manager = Self::load_file(explicit)?;
        manager.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        Ok(manager)
    }

    /// Load configuration without looking at the environment
    pub fn load_file(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Io {
                        path: path.display().to_string(),
                        message: "file does not exist".to_string(),
                    });
                }
                Some(path.to_path_buf())
            }
            None => Self::default_search_paths().into_iter().find(|p| p.exists()),
        };

        let config = match &path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let config = Self::parse(&content, ConfigFormat::from_path(path))?;
                info!("Loaded configuration from {:?}", path);
                config
            }
            None => {
                debug!("No configuration file found, using defaults");
                AppConfig::default()
            }
        };

        Ok(Self {
            config_path: path,
            config,
        })
    }

    /// Build a manager from in-memory content
    pub fn from_content(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        Ok(Self {
            config_path: None,
            config: Self::parse(content, format)?,
        })
    }

    /// Candidate files, in lookup order
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("reflect").join("config.toml"));
        }
        paths
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<AppConfig, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            format: format.name().to_string(),
            message,
        };
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = &mut self.config;

        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            config.feedback.api_key = Some(api_key);
            debug!("Applied env override for API key");
        }
        if let Some(provider) = lookup("REFLECT_PROVIDER") {
            config.feedback.provider = provider.parse()?;
            debug!("Applied env override for provider");
        }
        if let Some(model) = lookup("REFLECT_MODEL") {
            config.feedback.model = model;
            debug!("Applied env override for model");
        }
        if let Some(base_url) = lookup("REFLECT_BASE_URL") {
            config.feedback.base_url = base_url;
            debug!("Applied env override for base URL");
        }
        if let Some(host) = lookup("REFLECT_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("REFLECT_PORT") {
            config.server.port = port.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "REFLECT_PORT".to_string(),
                message: format!("{}", e),
            })?;
        }
        if let Some(min_chars) = lookup("REFLECT_MIN_CHARS") {
            let trimmed = min_chars.trim();
            config.session.min_reflection_chars = if trimmed.eq_ignore_ascii_case("none") {
                Some(0)
            } else {
                Some(trimmed.parse().map_err(|e| ConfigError::Invalid {
                    key: "REFLECT_MIN_CHARS".to_string(),
                    message: format!("{}", e),
                })?)
            };
        }
        if let Some(reset) = lookup("REFLECT_RESET_SCOPE") {
            config.session.reset_scope = match reset.trim() {
                "full" => ResetScope::Full,
                "draft_only" | "draft-only" => ResetScope::DraftOnly,
                other => {
                    return Err(ConfigError::Invalid {
                        key: "REFLECT_RESET_SCOPE".to_string(),
                        message: format!("expected 'full' or 'draft_only', got '{}'", other),
                    })
                }
            };
        }
        if let Some(level) = lookup("REFLECT_LOG") {
            config.logging.level = level;
        }

        // Resolve env:NAME references last so GEMINI_API_KEY wins over the file
        if let Some(reference) = config
            .feedback
            .api_key
            .as_deref()
            .and_then(|key| key.strip_prefix("env:"))
            .map(str::to_string)
        {
            if let Some(value) = lookup(&reference) {
                config.feedback.api_key = Some(value);
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// File the configuration was read from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
