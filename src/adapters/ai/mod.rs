//! AI Adapters.
//!
//! Implementations of the ImpactAnalyzer and Visualizer ports.
//!
//! ## Available Adapters
//!
//! - `MockImpactAnalyzer` / `MockVisualizer` - Configurable mocks for testing
//! - `GeminiImpactAnalyzer` - Structured-output analysis on Gemini
//! - `GeminiVisualizer` - Diorama image generation on Gemini

mod gemini_analyzer;
mod gemini_client;
mod gemini_visualizer;
mod mock_provider;

pub use gemini_analyzer::{analysis_schema, GeminiImpactAnalyzer};
pub use gemini_client::{
    GeminiClient, GeminiConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL,
};
pub use gemini_visualizer::{visualization_prompt, GeminiVisualizer, ScoreBand};
pub use mock_provider::{
    AnalyzeCall, MockError, MockImpactAnalyzer, MockResponse, MockVisualizer, VisualizeCall,
    PLACEHOLDER_PNG_BASE64,
};
