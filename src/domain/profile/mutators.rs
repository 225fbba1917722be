//! Pure profile mutators.
//!
//! Each function takes the current profile by value and returns the next
//! one. None of them touch storage; persisting the result is the caller's
//! job (and is skipped entirely for guests).

use super::{LogEntry, UserProfile};
use crate::domain::foundation::LogEntryId;

/// Prepends `entry` to the log and credits its points.
pub fn save(mut profile: UserProfile, entry: LogEntry) -> UserProfile {
    profile.total_points = profile.total_points.saturating_add(entry.points_earned());
    profile.logs.insert(0, entry);
    profile
}

/// Removes the entry with `log_id` and debits its points, floored at zero.
///
/// Unknown ids leave the profile untouched, so repeating a delete is harmless.
pub fn delete(mut profile: UserProfile, log_id: LogEntryId) -> UserProfile {
    let Some(position) = profile.logs.iter().position(|entry| entry.id() == log_id) else {
        return profile;
    };
    let removed = profile.logs.remove(position);
    profile.total_points = profile.total_points.saturating_sub(removed.points_earned());
    profile
}

/// Folds a guest's history into an identified profile at sign-in.
///
/// Guest entries go ahead of the identified entries and the point totals
/// are summed. A guest with no logs (or a profile that is not a guest at
/// all) changes nothing. The guest is consumed: merging the same guest
/// twice would double-count its points.
pub fn merge_guest_into(mut identified: UserProfile, guest: UserProfile) -> UserProfile {
    if !guest.is_guest || guest.logs.is_empty() {
        return identified;
    }
    identified.total_points = identified.total_points.saturating_add(guest.total_points);
    let mut logs = guest.logs;
    logs.append(&mut identified.logs);
    identified.logs = logs;
    identified
}
