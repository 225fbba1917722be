//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers apply a pure mutator and persist the result; query
//! handlers project read-only views.

pub mod handlers;

pub use handlers::{
    // Session
    AnalysisSessionManager, CommitSessionCommand, CommitSessionHandler, CommitSessionResult,
    Submission, VisualizationOutcome, VisualizationTask,
    // Profile
    DeleteLogCommand, DeleteLogHandler, DeleteLogResult, GetLeaderboardHandler,
    GetLeaderboardQuery, SaveLogCommand, SaveLogHandler, SaveLogResult, SignInCommand,
    SignInHandler, SignInResult, SignOutHandler,
};
