//! Analysis session handlers.

mod commit_session;
mod manager;

pub use commit_session::{CommitSessionCommand, CommitSessionHandler, CommitSessionResult};
pub use manager::{
    AnalysisSessionManager, Submission, VisualizationOutcome, VisualizationTask,
    DEFAULT_ANALYSIS_TIMEOUT, DEFAULT_VISUALIZATION_TIMEOUT,
};
