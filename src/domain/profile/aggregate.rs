//! UserProfile aggregate root.

use serde::{Deserialize, Serialize};

use super::LogEntry;
use crate::domain::foundation::{LogEntryId, Timestamp, UserId, ValidationError};

/// Display name given to every guest.
pub const GUEST_DISPLAY_NAME: &str = "Guest Explorer";

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Who signed in, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

impl Identity {
    /// Creates an identity; the avatar defaults to one seeded by the name.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let seed = name.split_whitespace().next().unwrap_or("eco").to_string();
        Ok(Self {
            id,
            name,
            email: email.into(),
            avatar_url: format!("{}{}", AVATAR_BASE_URL, seed),
        })
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = avatar_url.into();
        self
    }
}

/// The user's running record.
///
/// # Invariants
///
/// - `total_points` equals the sum of `points_earned` over `logs`; every
///   mutator maintains this incrementally
/// - `streak_days >= 1`
/// - `logs` are ordered newest first
/// - a guest profile is never written to durable storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub(super) id: UserId,
    pub(super) name: String,
    pub(super) email: String,
    pub(super) avatar_url: String,
    pub(super) total_points: u32,
    pub(super) streak_days: u32,
    #[serde(default)]
    pub(super) is_guest: bool,
    #[serde(default)]
    pub(super) logs: Vec<LogEntry>,
}

impl UserProfile {
    /// Creates an ephemeral guest seeded by the current time.
    pub fn guest() -> Self {
        Self::guest_at(Timestamp::now())
    }

    /// Creates an ephemeral guest seeded by `at`.
    pub fn guest_at(at: Timestamp) -> Self {
        let seed = at.as_unix_millis();
        Self {
            id: UserId::guest(seed),
            name: GUEST_DISPLAY_NAME.to_string(),
            email: String::new(),
            avatar_url: format!("{}{}", AVATAR_BASE_URL, seed),
            total_points: 0,
            streak_days: 1,
            is_guest: true,
            logs: Vec::new(),
        }
    }

    /// Creates a fresh identified profile on first sign-in.
    pub fn identified(identity: Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
            avatar_url: identity.avatar_url,
            total_points: 0,
            streak_days: 1,
            is_guest: false,
            logs: Vec::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First word of the display name, used for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn is_guest(&self) -> bool {
        self.is_guest
    }

    /// Log entries, newest first.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn log_count(&self) -> usize {
        self.logs.len()
    }

    pub fn find_log(&self, id: LogEntryId) -> Option<&LogEntry> {
        self.logs.iter().find(|entry| entry.id() == id)
    }

    /// Entries that carry a visualization, newest first.
    pub fn badges(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter().filter(|entry| entry.is_badge())
    }

    /// Sum of `points_earned` over the log; equals `total_points` on any
    /// profile built through the mutators.
    pub fn points_from_logs(&self) -> u32 {
        self.logs.iter().map(LogEntry::points_earned).sum()
    }
}
