//! Profile domain module.
//!
//! The `UserProfile` aggregate, its committed `LogEntry` history, the pure
//! mutators that produce the next profile, and the versioned storage record.

mod aggregate;
mod log_entry;
pub mod mutators;
mod record;

pub use aggregate::{Identity, UserProfile, GUEST_DISPLAY_NAME};
pub use log_entry::{points_for, LogEntry, MIN_POINTS_PER_LOG};
pub use mutators::{delete, merge_guest_into, save};
pub use record::{
    BareProfileToV1, ProfileMigrator, ProfileRecord, ProfileUpcaster, UpcastError,
    CURRENT_SCHEMA_VERSION,
};
