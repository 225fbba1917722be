//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod profile;
pub mod session;

pub use profile::{
    DeleteLogCommand, DeleteLogHandler, DeleteLogResult, GetLeaderboardHandler,
    GetLeaderboardQuery, SaveLogCommand, SaveLogHandler, SaveLogResult, SignInCommand,
    SignInHandler, SignInResult, SignOutHandler,
};
pub use session::{
    AnalysisSessionManager, CommitSessionCommand, CommitSessionHandler, CommitSessionResult,
    Submission, VisualizationOutcome, VisualizationTask,
};
