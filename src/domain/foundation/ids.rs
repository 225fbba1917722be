//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Prefix that marks an ephemeral guest identity.
pub const GUEST_ID_PREFIX: &str = "guest-";

/// Unique identifier for a committed log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntryId(Uuid);

impl LogEntryId {
    /// Creates a new random LogEntryId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a LogEntryId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogEntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identity tag of one analysis session.
///
/// Tags are handed out in increasing order by the session manager, so a
/// response carrying an older tag can never be mistaken for the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a SessionId from a raw tag value.
    pub fn from_raw(tag: u64) -> Self {
        Self(tag)
    }

    /// Returns the raw tag value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// User identifier (from the sign-in provider, or minted for a guest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Mints a guest identifier from a millisecond seed.
    pub fn guest(seed_millis: i64) -> Self {
        Self(format!("{}{}", GUEST_ID_PREFIX, seed_millis))
    }

    /// Returns true if this identifier was minted for a guest.
    pub fn is_guest(&self) -> bool {
        self.0.starts_with(GUEST_ID_PREFIX)
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_id_generates_unique_values() {
        assert_ne!(LogEntryId::new(), LogEntryId::new());
    }

    #[test]
    fn log_entry_id_parses_from_display() {
        let id = LogEntryId::new();
        let parsed: LogEntryId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn log_entry_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<LogEntryId>().is_err());
    }

    #[test]
    fn session_ids_order_by_tag() {
        assert!(SessionId::from_raw(1) < SessionId::from_raw(2));
        assert_eq!(SessionId::from_raw(7).to_string(), "session-7");
    }

    #[test]
    fn user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn guest_ids_carry_prefix() {
        let id = UserId::guest(1_700_000_000_000);
        assert_eq!(id.as_str(), "guest-1700000000000");
        assert!(id.is_guest());
        assert!(!UserId::new("user-1").unwrap().is_guest());
    }

    #[test]
    fn user_id_serializes_as_plain_string() {
        let id = UserId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
