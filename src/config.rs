//! Configuration and settings management
//!
//! Loads the plugin settings from a JSON file (with environment overrides)
//! and defines the fixed plugin constants.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the path of the configuration file
pub const CONFIG_PATH_ENV: &str = "GLM_VISION_CONFIG";
/// Configuration file used when `GLM_VISION_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
/// Prefix for environment overrides, e.g. `GLM_VISION__API__KEY`
const ENV_PREFIX: &str = "GLM_VISION";

/// Sampling temperature used when `api.temperature` is absent
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
/// Nucleus sampling value sent with every request
pub const TOP_P: f64 = 0.7;

/// Keywords that trigger image analysis
pub const IMAGE_KEYWORDS: &[&str] = &["智谱识图", "分析图片", "看图"];
/// Keywords that trigger video analysis
pub const VIDEO_KEYWORDS: &[&str] = &["智谱识视频", "分析视频", "看视频"];

/// Upstream API settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    /// Base URL, `/chat/completions` is appended to it
    pub base_url: String,
    /// Model identifier, e.g. `glm-4v-plus`
    pub model: String,
    /// Bearer token
    pub key: String,
    /// Whole-request timeout in seconds
    pub timeout: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Limits applied to downloaded images
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImageSettings {
    /// Maximum size in megabytes
    pub max_size: f64,
    /// Maximum length of the longer edge, in pixels
    pub max_pixels: u32,
}

/// Video limits. Shown in the help text only.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VideoSettings {
    /// Maximum size in megabytes
    pub max_size: f64,
    /// Maximum duration in seconds
    pub max_duration: u64,
}

/// Plugin settings, loaded once and never mutated
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub image: ImageSettings,
    pub video: VideoSettings,
}

const fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Settings {
    /// Load settings from the file named by `GLM_VISION_CONFIG`
    /// (or `config.json` in the working directory).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glm_vision::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file is missing, malformed, or fails validation.
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(Path::new(&path))
    }

    /// Load settings from an explicit JSON file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file is missing, malformed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json))
            // Eg.. `GLM_VISION__API__KEY=... ./glm-vision` overrides `api.key`
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true),
            )
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the document is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.key.trim().is_empty() {
            return Err(ConfigError::Message(
                "API key not found in configuration (api.key)".to_string(),
            ));
        }
        if !self.api.timeout.is_finite() || self.api.timeout <= 0.0 {
            return Err(ConfigError::Message(format!(
                "api.timeout must be a positive number of seconds, got {}",
                self.api.timeout
            )));
        }
        Ok(())
    }

    /// Request timeout for the upstream API
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.api.timeout)
    }
}
