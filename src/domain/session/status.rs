//! SessionStatus enum for the lifecycle of one analysis session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an analysis session.
///
/// `Idle` is not a variant: an actor with no live session is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Media accepted, analysis not started yet.
    Submitted,
    /// Waiting on the impact analysis engine.
    Analyzing,
    /// Analysis accepted, visualization outstanding.
    AwaitingVisualization,
    /// Analysis and visualization both available.
    Visualized,
    /// Analysis available, visualization failed. Still committable.
    VisualizationFailed,
    /// Analysis failed; nothing to commit.
    Failed,
    /// Turned into a log entry.
    Committed,
    /// Dropped by the user.
    Discarded,
}

impl SessionStatus {
    /// Still waiting on a collaborator. At most one such session per actor.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SessionStatus::Submitted | SessionStatus::Analyzing | SessionStatus::AwaitingVisualization
        )
    }

    /// An analysis result exists and the session may become a log entry.
    pub fn is_committable(&self) -> bool {
        matches!(
            self,
            SessionStatus::AwaitingVisualization
                | SessionStatus::Visualized
                | SessionStatus::VisualizationFailed
        )
    }
}

impl StateMachine for SessionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Submitted => vec![Analyzing, Discarded],
            Analyzing => vec![AwaitingVisualization, Failed, Discarded],
            AwaitingVisualization => vec![Visualized, VisualizationFailed, Committed, Discarded],
            Visualized => vec![Committed, Discarded],
            VisualizationFailed => vec![Committed, Discarded],
            Failed | Committed | Discarded => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Submitted => "Submitted",
            SessionStatus::Analyzing => "Analyzing",
            SessionStatus::AwaitingVisualization => "AwaitingVisualization",
            SessionStatus::Visualized => "Visualized",
            SessionStatus::VisualizationFailed => "VisualizationFailed",
            SessionStatus::Failed => "Failed",
            SessionStatus::Committed => "Committed",
            SessionStatus::Discarded => "Discarded",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus::*;

    const ALL: [SessionStatus; 8] = [
        Submitted,
        Analyzing,
        AwaitingVisualization,
        Visualized,
        VisualizationFailed,
        Failed,
        Committed,
        Discarded,
    ];

    #[test]
    fn analysis_cannot_be_skipped() {
        assert!(Submitted.transition_to(AwaitingVisualization).is_err());
        assert!(Submitted.transition_to(Committed).is_err());
    }

    #[test]
    fn analyzing_cannot_commit() {
        assert!(!Analyzing.can_transition_to(&Committed));
    }

    #[test]
    fn visualization_failure_is_still_committable() {
        assert!(VisualizationFailed.is_committable());
        assert!(VisualizationFailed.can_transition_to(&Committed));
    }

    #[test]
    fn every_live_status_can_be_discarded() {
        for status in ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(&Discarded), "{} should discard", status);
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(Failed.is_terminal());
        assert!(Committed.is_terminal());
        assert!(Discarded.is_terminal());
        assert!(!Visualized.is_terminal());
    }

    #[test]
    fn in_flight_matches_pending_collaborators() {
        let in_flight: Vec<_> = ALL.into_iter().filter(SessionStatus::is_in_flight).collect();
        assert_eq!(in_flight, vec![Submitted, Analyzing, AwaitingVisualization]);
    }

    #[test]
    fn committable_statuses_have_commit_edge() {
        for status in ALL {
            assert_eq!(status.is_committable(), status.can_transition_to(&Committed));
        }
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&AwaitingVisualization).unwrap(),
            "\"awaiting_visualization\""
        );
    }
}
