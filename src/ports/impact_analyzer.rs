//! Impact Analyzer Port - Interface for the remote impact-analysis engine.
//!
//! The engine receives raw captured media plus a MIME hint and answers with
//! an `AnalysisResult`. It must either honor the result's data contract
//! (closed category enumerations, score in `[0, 100]`) or fail; the session
//! layer never repairs an out-of-contract answer.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedAnalyzer(AnalysisResult);
//!
//! #[async_trait]
//! impl ImpactAnalyzer for FixedAnalyzer {
//!     async fn analyze(&self, _content: &[u8], _mime_hint: &str) -> Result<AnalysisResult, AnalysisError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::ValidationError;
use crate::domain::impact::AnalysisResult;

/// Port for the impact-analysis engine.
#[async_trait]
pub trait ImpactAnalyzer: Send + Sync {
    /// Assess the environmental impact of `content`.
    ///
    /// `mime_hint` is `text/plain` for free-text descriptions and the
    /// capture MIME type otherwise.
    async fn analyze(&self, content: &[u8], mime_hint: &str)
        -> Result<AnalysisResult, AnalysisError>;
}

/// Impact analysis errors.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Rate limited by the engine.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Engine is unavailable.
    #[error("analysis engine unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Engine response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Engine answered with a result outside the data contract.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Request was rejected before reaching the engine.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("analysis timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AnalysisError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

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

    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns true if resubmitting the same media may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::RateLimited { .. }
                | AnalysisError::Unavailable { .. }
                | AnalysisError::Network(_)
                | AnalysisError::Timeout { .. }
        )
    }
}

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::ContractViolation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(AnalysisError::rate_limited(30).is_retryable());
        assert!(AnalysisError::network("reset").is_retryable());
        assert!(AnalysisError::timeout(60).is_retryable());
        assert!(AnalysisError::unavailable("503").is_retryable());
    }

    #[test]
    fn contract_and_auth_failures_are_not_retryable() {
        assert!(!AnalysisError::contract("score 140").is_retryable());
        assert!(!AnalysisError::AuthenticationFailed.is_retryable());
        assert!(!AnalysisError::parse("not json").is_retryable());
    }

    #[test]
    fn validation_error_becomes_contract_violation() {
        let err: AnalysisError = ValidationError::empty_field("summary").into();
        assert!(matches!(err, AnalysisError::ContractViolation(_)));
        assert!(err.to_string().contains("summary"));
    }
}
