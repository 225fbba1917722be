//! Profile command and query handlers.
//!
//! Each command applies one pure mutator and writes the whole record back,
//! except for guests, which never reach the store.

mod delete_log;
mod get_leaderboard;
mod save_log;
mod sign_in;
mod sign_out;

pub use delete_log::{DeleteLogCommand, DeleteLogHandler, DeleteLogResult};
pub use get_leaderboard::{GetLeaderboardHandler, GetLeaderboardQuery};
pub use save_log::{SaveLogCommand, SaveLogHandler, SaveLogResult};
pub use sign_in::{SignInCommand, SignInHandler, SignInResult};
pub use sign_out::SignOutHandler;

use tracing::debug;

use crate::domain::profile::UserProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// Replaces the stored record with `profile` unless it is a guest.
///
/// Returns whether a write happened.
pub(crate) async fn persist_unless_guest(
    store: &dyn ProfileStore,
    profile: &UserProfile,
) -> Result<bool, ProfileStoreError> {
    if profile.is_guest() {
        debug!(user_id = %profile.id(), "Guest profile kept in memory only");
        return Ok(false);
    }
    store.replace(profile).await?;
    Ok(true)
}
