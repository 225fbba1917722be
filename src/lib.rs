//! Green Mirror - Eco-impact logging core
//!
//! Drives captured media (photo, video, audio or a text description)
//! through an impact analysis and an illustrative visualization, then folds
//! the committed result into the user's profile, from which points,
//! streaks, daily habit completion and a ranked leaderboard are derived.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
