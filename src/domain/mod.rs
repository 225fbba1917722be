//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `impact` - Captured media and the analysis result data contract
//! - `profile` - UserProfile aggregate, log entries, mutators, storage record
//! - `session` - Analysis session lifecycle
//! - `leaderboard` - Ranking projection
//! - `progress` - Daily habit completion projection

pub mod foundation;
pub mod impact;
pub mod leaderboard;
pub mod profile;
pub mod progress;
pub mod session;
