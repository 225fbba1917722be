//! Visualizer Port - Interface for the remote image-generation engine.
//!
//! Visualization is best-effort: a failure never invalidates the analysis
//! it illustrates, it only means the resulting log entry carries no badge.

use async_trait::async_trait;

use crate::domain::impact::{CarbonScore, ImageHandle};

/// Port for the image-generation engine.
#[async_trait]
pub trait Visualizer: Send + Sync {
    /// Render an illustration of an activity with the given impact.
    async fn visualize(
        &self,
        summary: &str,
        score: CarbonScore,
    ) -> Result<ImageHandle, VisualizationError>;
}

/// Image generation errors.
#[derive(Debug, thiserror::Error)]
pub enum VisualizationError {
    /// Rate limited by the engine.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Engine is unavailable.
    #[error("image engine unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Engine response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Engine answered without any image part.
    #[error("response contained no image")]
    NoImage,

    /// Request timed out.
    #[error("visualization timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl VisualizationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }
}
