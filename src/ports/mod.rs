//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `ImpactAnalyzer` - remote impact-analysis engine
//! - `Visualizer` - remote image-generation engine
//! - `ComparisonSource` - other leaderboard participants
//!
//! ## Storage Ports
//!
//! - `ProfileStore` - whole-record durable profile storage

mod comparison_source;
mod impact_analyzer;
mod profile_store;
mod visualizer;

pub use comparison_source::{ComparisonError, ComparisonSource};
pub use impact_analyzer::{AnalysisError, ImpactAnalyzer};
pub use profile_store::{ProfileStore, ProfileStoreError};
pub use visualizer::{VisualizationError, Visualizer};
