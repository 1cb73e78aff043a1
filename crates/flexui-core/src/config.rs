//! Modifier configuration
//!
//! Loaded from TOML; every field is optional and falls back to the
//! defaults below. Credentials are never part of the file, only the name of
//! the environment variable that holds them.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Oracle endpoint and sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleSettings {
    /// OpenAI-compatible API root (without `/chat/completions`)
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// Environment variable holding the bearer key
    pub api_key_env: String,
    /// Per-call HTTP timeout
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            model: "meta/llama-3.3-70b-instruct".to_string(),
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 2048,
            api_key_env: "NVIDIA_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl OracleSettings {
    /// Read the bearer key from the configured environment variable
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    pub oracle: OracleSettings,
    /// Caller-side bound on a whole modification
    pub request_timeout_secs: u64,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            oracle: OracleSettings::default(),
            request_timeout_secs: 120,
        }
    }
}

impl ModifierConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With oracle base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.oracle.base_url = url.into();
        self
    }

    /// With oracle model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.oracle.model = model.into();
        self
    }

    /// With credential environment variable
    #[inline]
    #[must_use]
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.oracle.api_key_env = var.into();
        self
    }

    /// With whole-request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// for out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded modifier config");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let oracle = &self.oracle;
        if oracle.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.base_url must not be empty".into()));
        }
        if oracle.model.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&oracle.temperature) {
            return Err(ConfigError::Invalid(format!(
                "oracle.temperature must be within 0..=2, got {}",
                oracle.temperature
            )));
        }
        if !(oracle.top_p > 0.0 && oracle.top_p <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "oracle.top_p must be within (0, 1], got {}",
                oracle.top_p
            )));
        }
        if oracle.max_tokens == 0 {
            return Err(ConfigError::Invalid("oracle.max_tokens must be positive".into()));
        }
        if oracle.timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".into()));
        }
        Ok(())
    }
}
