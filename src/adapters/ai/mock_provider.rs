//! Mock analysis and visualization engines for testing.
//!
//! Configurable implementations of the `ImpactAnalyzer` and `Visualizer`
//! ports, so tests and offline runs never call a real model.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for race and timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let analyzer = MockImpactAnalyzer::new()
//!     .with_result(result)
//!     .with_delay(Duration::from_millis(100));
//!
//! let result = analyzer.analyze(b"Cycled to work", "text/plain").await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::impact::{AnalysisResult, CarbonScore, ImageHandle, MainCategory};
use crate::ports::{AnalysisError, ImpactAnalyzer, VisualizationError, Visualizer};

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate engine unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate an undecodable response.
    Parse { message: String },
    /// Simulate an out-of-contract result (analysis only).
    ContractViolation { message: String },
    /// Simulate a response with no image (visualization only).
    NoImage,
}

impl From<MockError> for AnalysisError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                AnalysisError::rate_limited(retry_after_secs)
            }
            MockError::Unavailable { message } => AnalysisError::unavailable(message),
            MockError::AuthenticationFailed => AnalysisError::AuthenticationFailed,
            MockError::Network { message } => AnalysisError::network(message),
            MockError::Timeout { timeout_secs } => AnalysisError::timeout(timeout_secs),
            MockError::Parse { message } => AnalysisError::parse(message),
            MockError::ContractViolation { message } => AnalysisError::contract(message),
            MockError::NoImage => AnalysisError::parse("empty response"),
        }
    }
}

impl From<MockError> for VisualizationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => {
                VisualizationError::RateLimited { retry_after_secs }
            }
            MockError::Unavailable { message } => VisualizationError::unavailable(message),
            MockError::AuthenticationFailed => VisualizationError::AuthenticationFailed,
            MockError::Network { message } => VisualizationError::network(message),
            MockError::Timeout { timeout_secs } => VisualizationError::timeout(timeout_secs),
            MockError::Parse { message } | MockError::ContractViolation { message } => {
                VisualizationError::parse(message)
            }
            MockError::NoImage => VisualizationError::NoImage,
        }
    }
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse<T> {
    Success(T),
    Error(MockError),
}

/// One recorded `analyze` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeCall {
    pub content: Vec<u8>,
    pub mime_hint: String,
}

/// One recorded `visualize` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizeCall {
    pub summary: String,
    pub score: CarbonScore,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock impact analyzer.
#[derive(Debug, Clone, Default)]
pub struct MockImpactAnalyzer {
    responses: Arc<Mutex<VecDeque<MockResponse<AnalysisResult>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<AnalyzeCall>>>,
}

impl MockImpactAnalyzer {
    /// Creates a new mock analyzer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful result to the queue.
    pub fn with_result(self, result: AnalysisResult) -> Self {
        locked(&self.responses).push_back(MockResponse::Success(result));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        locked(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<AnalyzeCall> {
        locked(&self.calls).clone()
    }

    fn next_response(&self, mime_hint: &str) -> MockResponse<AnalysisResult> {
        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success(default_result(mime_hint)))
    }
}

fn default_result(mime_hint: &str) -> AnalysisResult {
    AnalysisResult {
        summary: format!("Mock assessment of {} input", mime_hint),
        main_category: MainCategory::Lifestyle,
        total_carbon_score: CarbonScore::saturating(50),
        items: Vec::new(),
        general_tips: vec!["Small daily choices add up".to_string()],
    }
}

#[async_trait]
impl ImpactAnalyzer for MockImpactAnalyzer {
    async fn analyze(
        &self,
        content: &[u8],
        mime_hint: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        locked(&self.calls).push(AnalyzeCall {
            content: content.to_vec(),
            mime_hint: mime_hint.to_string(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(mime_hint) {
            MockResponse::Success(result) => Ok(result),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

/// Mock image generator.
#[derive(Debug, Clone, Default)]
pub struct MockVisualizer {
    responses: Arc<Mutex<VecDeque<MockResponse<ImageHandle>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<VisualizeCall>>>,
}

/// 1x1 transparent PNG returned when nothing is queued.
pub const PLACEHOLDER_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

impl MockVisualizer {
    /// Creates a new mock visualizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an image to the queue.
    pub fn with_image(self, image: ImageHandle) -> Self {
        locked(&self.responses).push_back(MockResponse::Success(image));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        locked(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<VisualizeCall> {
        locked(&self.calls).clone()
    }

    fn next_response(&self) -> MockResponse<ImageHandle> {
        locked(&self.responses).pop_front().unwrap_or_else(|| {
            MockResponse::Success(ImageHandle::data_uri("image/png", PLACEHOLDER_PNG_BASE64))
        })
    }
}

#[async_trait]
impl Visualizer for MockVisualizer {
    async fn visualize(
        &self,
        summary: &str,
        score: CarbonScore,
    ) -> Result<ImageHandle, VisualizationError> {
        locked(&self.calls).push(VisualizeCall {
            summary: summary.to_string(),
            score,
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(image) => Ok(image),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}
