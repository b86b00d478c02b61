//! Configuration for the FlavorMap client
//!
//! Loaded from `config.toml` in the platform config directory, with
//! `FLAVORMAP_BACKEND_URL` overriding the backend address.

use crate::audio::CaptureProfile;
use crate::speech::VoiceConfig;
use crate::{FlavorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const BACKEND_URL_ENV: &str = "FLAVORMAP_BACKEND_URL";

/// Port the recipe backend listens on
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend host, including the scheme
    pub backend_url: String,

    pub port: u16,

    /// Upper bound for any single backend request
    pub request_timeout_secs: u64,

    /// Language sent with recordings and used for spoken replies
    pub language_code: String,

    /// Recording format sent to the backend
    pub capture: CaptureProfile,

    /// Where the local key-value store lives
    pub data_dir: PathBuf,

    /// Whether to open the microphone at all
    pub enable_audio_input: bool,

    /// Optional VITS voice for spoken replies
    pub voice: Option<VoiceConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost".to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: 30,
            language_code: "en-GB".to_string(),
            capture: CaptureProfile::default(),
            data_dir: default_data_dir(),
            enable_audio_input: true,
            voice: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("flavormap")
}

/// Default location of `config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flavormap").join("config.toml"))
}

impl AppConfig {
    /// Load the configuration file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                info!("Using backend from {}", BACKEND_URL_ENV);
                config.backend_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FlavorError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FlavorError::Config(format!("Invalid config: {}", e)))
    }

    /// `{backend_url}:{port}` with any trailing slash removed
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.backend_url.trim_end_matches('/'), self.port)
    }

    /// Path of the key-value store file
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    pub fn with_backend(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Disable the microphone (browse-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(FlavorError::Config("Backend URL is required".into()));
        }

        if self.port == 0 {
            return Err(FlavorError::Config("Backend port must be non-zero".into()));
        }

        if self.capture.sample_rate == 0 {
            return Err(FlavorError::Config(
                "Capture sample rate must be greater than 0".into(),
            ));
        }

        if let Some(voice) = &self.voice {
            if !voice.model_path.exists() {
                warn!("Voice model not found: {:?}", voice.model_path);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.language_code, "en-GB");
        assert_eq!(config.capture.sample_rate, 16000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url() {
        let config = AppConfig::default().with_backend("http://192.168.1.20/");
        assert_eq!(config.base_url(), "http://192.168.1.20:8000");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            backend_url = "http://recipes.local"
            request_timeout_secs = 5

            [capture]
            sample_rate = 44100
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_url, "http://recipes.local");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.capture.sample_rate, 44100);
        assert_eq!(config.capture.channels, 1);
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_invalid_config() {
        assert!(AppConfig::default().with_backend(" ").validate().is_err());

        let mut config = AppConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        assert!(AppConfig::from_toml("port = \"eighty\"").is_err());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::default()
            .with_data_dir("/tmp/flavormap-test")
            .without_audio_input();

        assert!(!config.enable_audio_input);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/flavormap-test/store.json"));
    }
}
