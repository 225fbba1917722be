//! AnalysisSession aggregate entity.
//!
//! One session drives a single piece of captured media through analysis and
//! visualization until it is committed as a log entry or discarded.
//!
//! # Ownership
//!
//! The session owns the captured media and the transient result until
//! commit. Committing consumes the session, releasing the media, and hands
//! the resulting `LogEntry` to the caller.

use serde::Serialize;

use super::SessionStatus;
use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, StateMachine, Timestamp, UserId,
};
use crate::domain::impact::{AnalysisResult, CapturedMedia, ImageHandle, MediumTag};
use crate::domain::profile::LogEntry;

/// Analysis session aggregate.
///
/// # Invariants
///
/// - `result` is present iff the status is committable
/// - `visualization` is present only in `Visualized`
/// - media is held until the session ends or analysis fails
#[derive(Debug)]
pub struct AnalysisSession {
    id: SessionId,
    owner: UserId,
    medium: MediumTag,
    media: Option<CapturedMedia>,
    status: SessionStatus,
    result: Option<AnalysisResult>,
    visualization: Option<ImageHandle>,
    submitted_at: Timestamp,
}

impl AnalysisSession {
    /// Opens a session for freshly captured media.
    pub fn submit(id: SessionId, owner: UserId, media: CapturedMedia) -> Self {
        Self {
            id,
            owner,
            medium: media.medium(),
            media: Some(media),
            status: SessionStatus::Submitted,
            result: None,
            visualization: None,
            submitted_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn medium(&self) -> MediumTag {
        self.medium
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn visualization(&self) -> Option<&ImageHandle> {
        self.visualization.as_ref()
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }

    /// Captured media, until the session releases it.
    pub fn media(&self) -> Option<&CapturedMedia> {
        self.media.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.status.is_in_flight()
    }

    /// Moves to `Analyzing` and returns a handle to the media for the call.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the session was just submitted
    pub fn begin_analysis(&mut self) -> Result<CapturedMedia, DomainError> {
        self.status = self.status.transition_to(SessionStatus::Analyzing)?;
        self.media.clone().ok_or_else(|| {
            DomainError::new(
                ErrorCode::InternalError,
                "submitted session holds no media",
            )
        })
    }

    /// Accepts a validated analysis result.
    pub fn record_analysis(&mut self, result: AnalysisResult) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(SessionStatus::AwaitingVisualization)?;
        self.result = Some(result);
        Ok(())
    }

    /// Marks the analysis as failed and releases the media.
    pub fn record_analysis_failure(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SessionStatus::Failed)?;
        self.media = None;
        Ok(())
    }

    /// Attaches the generated illustration.
    pub fn record_visualization(&mut self, image: ImageHandle) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SessionStatus::Visualized)?;
        self.visualization = Some(image);
        Ok(())
    }

    /// Notes that no illustration will arrive. The result stays committable.
    pub fn record_visualization_failure(&mut self) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(SessionStatus::VisualizationFailed)?;
        Ok(())
    }

    /// Turns the session into a log entry stamped with the current time.
    ///
    /// Consumes the session, so the media and any image not carried into
    /// the entry are released on return.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if no analysis result exists yet
    pub fn commit(self) -> Result<LogEntry, DomainError> {
        self.commit_at(Timestamp::now())
    }

    /// Like `commit`, with an explicit commit time.
    pub fn commit_at(self, at: Timestamp) -> Result<LogEntry, DomainError> {
        let entry = self.draft_entry_at(at)?;
        self.close_committed()?;
        Ok(entry)
    }

    /// Builds the entry a commit at `at` would produce. The session stays live.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if no analysis result exists yet
    pub fn draft_entry_at(&self, at: Timestamp) -> Result<LogEntry, DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Committed) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("cannot commit a session that is {}", self.status),
            ));
        }
        let result = self.result.clone().ok_or_else(|| {
            DomainError::new(
                ErrorCode::NotCommittable,
                "session has no analysis result",
            )
        })?;
        Ok(LogEntry::recorded_at(
            at,
            self.medium,
            result,
            self.visualization.clone(),
        ))
    }

    /// Ends a session whose drafted entry has been accepted.
    ///
    /// Consumes the session, releasing the media and image.
    pub fn close_committed(self) -> Result<SessionId, DomainError> {
        self.status.transition_to(SessionStatus::Committed)?;
        Ok(self.id)
    }

    /// Ends the session without producing an entry.
    ///
    /// Consumes the session, releasing the media and any result.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the session already ended
    pub fn discard(self) -> Result<SessionId, DomainError> {
        self.status.transition_to(SessionStatus::Discarded)?;
        Ok(self.id)
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            status: self.status,
            medium: self.medium,
            result: self.result.clone(),
            visualization: self.visualization.clone(),
        }
    }
}

/// Point-in-time copy of a session's observable state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub status: SessionStatus,
    pub medium: MediumTag,
    pub result: Option<AnalysisResult>,
    pub visualization: Option<ImageHandle>,
}

impl SessionSnapshot {
    /// Saving with a badge is offered only once an illustration exists.
    pub fn badge_available(&self) -> bool {
        self.visualization.is_some()
    }

    pub fn is_committable(&self) -> bool {
        self.status.is_committable()
    }
}
