//! GetLeaderboardHandler - Query handler for the ranked comparison view.

use std::sync::Arc;

use crate::domain::leaderboard::{LeaderboardEntry, RankingProjector};
use crate::domain::profile::UserProfile;
use crate::ports::{ComparisonError, ComparisonSource};

/// Query for the leaderboard around `profile`.
#[derive(Debug, Clone)]
pub struct GetLeaderboardQuery {
    pub profile: UserProfile,
}

/// Handler for leaderboard queries.
pub struct GetLeaderboardHandler {
    comparison: Arc<dyn ComparisonSource>,
}

impl GetLeaderboardHandler {
    pub fn new(comparison: Arc<dyn ComparisonSource>) -> Self {
        Self { comparison }
    }

    pub async fn handle(
        &self,
        query: GetLeaderboardQuery,
    ) -> Result<Vec<LeaderboardEntry>, ComparisonError> {
        let participants = self.comparison.participants().await?;
        Ok(RankingProjector::rankings(&query.profile, &participants))
    }
}
