//! Session-specific error types.

use super::SessionStatus;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::{AnalysisError, ProfileStoreError};

/// Session-specific errors.
#[derive(Debug)]
pub enum SessionError {
    /// The actor already has a session waiting on a collaborator.
    InFlight(SessionId),
    /// The actor has no live session.
    NoActiveSession,
    /// No analysis result exists yet.
    NotCommittable(SessionStatus),
    /// The analysis engine failed; the actor is back to idle.
    Analysis(AnalysisError),
    /// The session was committed, discarded or replaced while a call was outstanding.
    Superseded(SessionId),
    /// Invalid state for operation.
    InvalidState(String),
    /// Persisting the committed entry failed.
    Store(ProfileStoreError),
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SessionError::InvalidState(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::InFlight(_) => ErrorCode::SessionInFlight,
            SessionError::NoActiveSession => ErrorCode::NoActiveSession,
            SessionError::NotCommittable(_) => ErrorCode::NotCommittable,
            SessionError::Analysis(AnalysisError::ContractViolation(_)) => {
                ErrorCode::ContractViolation
            }
            SessionError::Analysis(_) => ErrorCode::AnalysisFailed,
            SessionError::Superseded(_) => ErrorCode::SessionSuperseded,
            SessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            SessionError::Store(_) => ErrorCode::StorageError,
            SessionError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::InFlight(id) => format!("{} is still in progress", id),
            SessionError::NoActiveSession => "No active analysis session".to_string(),
            SessionError::NotCommittable(status) => {
                format!("Cannot save a session that is {}", status)
            }
            SessionError::Analysis(err) => format!("Analysis failed: {}", err),
            SessionError::Superseded(id) => format!("{} is no longer active", id),
            SessionError::InvalidState(msg) => format!("Invalid state: {}", msg),
            SessionError::Store(err) => format!("Could not save profile: {}", err),
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Analysis(err) => Some(err),
            SessionError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnalysisError> for SessionError {
    fn from(err: AnalysisError) -> Self {
        SessionError::Analysis(err)
    }
}

impl From<ProfileStoreError> for SessionError {
    fn from(err: ProfileStoreError) -> Self {
        SessionError::Store(err)
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => SessionError::InvalidState(err.to_string()),
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}
