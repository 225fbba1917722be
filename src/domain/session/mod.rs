//! Session domain module.
//!
//! Drives one piece of captured media through impact analysis and
//! visualization until it is committed as a log entry or discarded.
//!
//! # Lifecycle
//!
//! `Submitted -> Analyzing -> AwaitingVisualization -> Visualized`, with
//! `VisualizationFailed` as the badge-less alternative and `Failed` when the
//! analysis itself fails. Any live session can be discarded; only one with a
//! result can be committed.

mod aggregate;
mod errors;
mod status;

pub use aggregate::{AnalysisSession, SessionSnapshot};
pub use errors::SessionError;
pub use status::SessionStatus;
