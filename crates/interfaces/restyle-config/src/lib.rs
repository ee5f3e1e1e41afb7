//! Central configuration constants and the startup environment read.

use std::time::Duration;

/// Environment variable holding the API key. Required.
pub const API_KEY_ENV: &str = "API_KEY";

/// Optional override of the API endpoint (used by tests and proxies).
pub const BASE_URL_ENV: &str = "RESTYLE_API_BASE_URL";

/// Optional override of the prompt-derivation model.
pub const PROMPT_MODEL_ENV: &str = "RESTYLE_PROMPT_MODEL";

/// Optional override of the image-synthesis model.
pub const IMAGE_MODEL_ENV: &str = "RESTYLE_IMAGE_MODEL";

/// Optional per-request timeout in seconds. Unset means no local timeout.
pub const REQUEST_TIMEOUT_ENV: &str = "RESTYLE_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

pub const DEFAULT_PROMPT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("invalid RESTYLE_REQUEST_TIMEOUT_SECS value: {0}")]
    InvalidTimeout(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub prompt_model: String,
    pub image_model: String,
    pub request_timeout: Option<Duration>,
}

// The key stays out of logs and panics.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("prompt_model", &self.prompt_model)
            .field("image_model", &self.image_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt_model: DEFAULT_PROMPT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads the process environment once. A missing key is fatal for the caller.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let mut cfg = Self::new(api_key.trim());

        if let Some(url) = get(BASE_URL_ENV) {
            cfg.base_url = url;
        }
        if let Some(model) = get(PROMPT_MODEL_ENV) {
            cfg.prompt_model = model;
        }
        if let Some(model) = get(IMAGE_MODEL_ENV) {
            cfg.image_model = model;
        }
        if let Some(raw) = get(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            cfg.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(cfg)
    }
}
