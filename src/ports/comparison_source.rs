//! ComparisonSource port - the other participants shown on the leaderboard.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::leaderboard::Participant;

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("comparison set unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the comparison set for ranking.
#[async_trait]
pub trait ComparisonSource: Send + Sync {
    /// Participants in the order they should enter the ranking.
    async fn participants(&self) -> Result<Vec<Participant>, ComparisonError>;
}
