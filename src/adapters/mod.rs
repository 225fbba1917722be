//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Impact analysis and visualization engines (Gemini, mock)
//! - `comparison` - Leaderboard comparison sets
//! - `storage` - Profile record persistence (file, in-memory)

pub mod ai;
pub mod comparison;
pub mod storage;

pub use comparison::StaticComparisonSource;
pub use storage::{FileProfileStore, InMemoryProfileStore};
