//! Gemini Client - shared HTTP plumbing for the Gemini `generateContent` API.
//!
//! Both the impact analyzer and the visualizer talk to the same endpoint
//! with different models; this module owns the configuration, the wire
//! types, retries and the mapping of HTTP failures.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_analysis_model("gemini-2.5-flash")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let client = GeminiClient::new(config)?;
//! ```

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{AnalysisError, VisualizationError};

/// Default model for impact analysis.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Model used for impact analysis.
    pub analysis_model: String,
    /// Model used for image generation.
    pub image_model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the analysis model.
    pub fn with_analysis_model(mut self, model: impl Into<String>) -> Self {
        self.analysis_model = model.into();
        self
    }

    /// Sets the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Failure of one `generateContent` call, before it is mapped onto a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallError {
    RateLimited { retry_after_secs: u32 },
    Authentication,
    Unavailable(String),
    Network(String),
    Timeout { timeout_secs: u32 },
    InvalidRequest(String),
    Parse(String),
}

impl CallError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            CallError::RateLimited { .. }
                | CallError::Unavailable(_)
                | CallError::Network(_)
                | CallError::Timeout { .. }
        )
    }

    /// Maps a non-success HTTP status and body.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => CallError::Authentication,
            429 => CallError::RateLimited {
                retry_after_secs: parse_retry_after(&body),
            },
            400 | 404 => CallError::InvalidRequest(body),
            500..=599 => CallError::Unavailable(format!("Server error {}: {}", status, body)),
            _ => CallError::Network(format!("Unexpected status {}: {}", status, body)),
        }
    }
}

impl From<CallError> for AnalysisError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::RateLimited { retry_after_secs } => {
                AnalysisError::rate_limited(retry_after_secs)
            }
            CallError::Authentication => AnalysisError::AuthenticationFailed,
            CallError::Unavailable(message) => AnalysisError::unavailable(message),
            CallError::Network(message) => AnalysisError::network(message),
            CallError::Timeout { timeout_secs } => AnalysisError::timeout(timeout_secs),
            CallError::InvalidRequest(message) => AnalysisError::InvalidRequest(message),
            CallError::Parse(message) => AnalysisError::parse(message),
        }
    }
}

impl From<CallError> for VisualizationError {
    fn from(err: CallError) -> Self {
        match err {
            CallError::RateLimited { retry_after_secs } => {
                VisualizationError::RateLimited { retry_after_secs }
            }
            CallError::Authentication => VisualizationError::AuthenticationFailed,
            CallError::Unavailable(message) => VisualizationError::unavailable(message),
            CallError::Network(message) => VisualizationError::network(message),
            CallError::Timeout { timeout_secs } => VisualizationError::timeout(timeout_secs),
            CallError::InvalidRequest(message) | CallError::Parse(message) => {
                VisualizationError::parse(message)
            }
        }
    }
}

/// Reads `retryDelay` ("30s") from a Gemini error body.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .pointer("/error/details")
                .and_then(|details| details.as_array())
                .and_then(|details| {
                    details
                        .iter()
                        .find_map(|detail| detail.get("retryDelay").and_then(|d| d.as_str()))
                        .map(str::to_string)
                })
        })
        .and_then(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
        .map(|secs| secs.ceil() as u32)
        .unwrap_or(30)
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn send(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<Response, CallError> {
        self.client
            .post(self.generate_url(model))
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    CallError::Network(format!("Connection failed: {}", e))
                } else {
                    CallError::Network(e.to_string())
                }
            })
    }

    async fn parse(response: Response) -> Result<GenerateContentResponse, CallError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::from_status(status.as_u16(), body));
        }
        response
            .json()
            .await
            .map_err(|e| CallError::Parse(format!("Failed to parse response: {}", e)))
    }

    /// Calls `generateContent` on `model`, retrying transient failures.
    pub(crate) async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CallError> {
        let mut retry_count = 0;
        loop {
            let outcome = match self.send(model, request).await {
                Ok(response) => Self::parse(response).await,
                Err(err) => Err(err),
            };
            match outcome {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    warn!(model, attempt = retry_count + 1, error = ?err, "Gemini call failed, retrying");
                }
                Err(err) => return Err(err),
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(Duration::from_secs(1 << retry_count)).await;
            retry_count += 1;
        }
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline payload of the first candidate.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .find_map(|part| part.inline_data.as_ref())
    }
}
