//! Analysis and visualization engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{
    GeminiConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL,
};

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which engine serves analysis and visualization
    #[serde(default)]
    pub provider: AiProvider,

    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for impact analysis
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    /// Model used for image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// Engine type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    /// Canned responses, no network
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upper bound on one logical call, covering every retry and its backoff
    pub fn call_budget(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        let backoff_secs = (1u64 << self.max_retries.min(16)) - 1;
        self.timeout() * attempts + Duration::from_secs(backoff_secs)
    }

    /// Check if a Gemini key is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Client settings for the Gemini adapters, if a key is configured
    pub fn gemini(&self) -> Option<GeminiConfig> {
        let key = self.gemini_api_key.as_ref().filter(|k| !k.is_empty())?;
        Some(
            GeminiConfig::new(key.clone())
                .with_base_url(self.base_url.clone())
                .with_analysis_model(self.analysis_model.clone())
                .with_image_model(self.image_model.clone())
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProvider::Gemini && !self.has_gemini() {
            return Err(ValidationError::MissingRequired("GEMINI_API_KEY"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            gemini_api_key: None,
            base_url: default_base_url(),
            analysis_model: default_analysis_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_analysis_model() -> String {
    DEFAULT_ANALYSIS_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    2
}
