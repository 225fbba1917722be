//! Committed analysis sessions and the points policy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LogEntryId, Timestamp};
use crate::domain::impact::{AnalysisResult, CarbonScore, ImageHandle, MediumTag};

/// Floor reward for logging any activity, however carbon-heavy.
pub const MIN_POINTS_PER_LOG: u32 = 10;

/// Points earned for a result with the given score: `max(10, 100 - score)`.
pub fn points_for(score: CarbonScore) -> u32 {
    let inverse = 100 - u32::from(score.value());
    inverse.max(MIN_POINTS_PER_LOG)
}

/// A committed session. Immutable after creation.
///
/// # Invariants
///
/// - `points_earned >= 10`
/// - `recorded_at` is commit time, not capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    id: LogEntryId,
    #[serde(rename = "date")]
    recorded_at: Timestamp,
    #[serde(rename = "mediaType")]
    medium: MediumTag,
    result: AnalysisResult,
    #[serde(
        rename = "visualizationUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    visualization: Option<ImageHandle>,
    points_earned: u32,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        medium: MediumTag,
        result: AnalysisResult,
        visualization: Option<ImageHandle>,
    ) -> Self {
        Self::recorded_at(Timestamp::now(), medium, result, visualization)
    }

    /// Creates an entry stamped with an explicit commit time.
    pub fn recorded_at(
        at: Timestamp,
        medium: MediumTag,
        result: AnalysisResult,
        visualization: Option<ImageHandle>,
    ) -> Self {
        let points_earned = points_for(result.total_carbon_score);
        Self {
            id: LogEntryId::new(),
            recorded_at: at,
            medium,
            result,
            visualization,
            points_earned,
        }
    }

    pub fn id(&self) -> LogEntryId {
        self.id
    }

    pub fn recorded_at_time(&self) -> &Timestamp {
        &self.recorded_at
    }

    pub fn medium(&self) -> MediumTag {
        self.medium
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn visualization(&self) -> Option<&ImageHandle> {
        self.visualization.as_ref()
    }

    /// An entry carrying a visualization is displayed as a badge.
    pub fn is_badge(&self) -> bool {
        self.visualization.is_some()
    }

    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }
}
