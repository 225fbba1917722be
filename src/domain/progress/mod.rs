//! Progress domain module.
//!
//! Per-habit "done today" status derived from the log history.

mod daily;

pub use daily::{DailyCompletion, TrackedHabit};
