//! Leaderboard domain module.
//!
//! Pure projection of the current profile plus a comparison set into a
//! ranked list. Nothing here is stored.

mod ranking;

pub use ranking::{LeaderboardEntry, Participant, RankingProjector};
