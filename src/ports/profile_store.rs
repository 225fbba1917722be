//! ProfileStore port - durable whole-record storage of one profile.
//!
//! The store holds at most one identified profile. Reads return the whole
//! record and writes replace it; there are no partial updates, so the last
//! write wins.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::profile::{UpcastError, UserProfile};

/// Errors that can occur while reading or replacing the stored record.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("failed to serialize profile: {0}")]
    Serialization(String),

    #[error("failed to deserialize stored profile: {0}")]
    Deserialization(String),

    #[error("failed to migrate stored profile: {0}")]
    Migration(#[from] UpcastError),

    #[error("guest profile {0} cannot be persisted")]
    GuestNotPersistable(UserId),
}

impl ProfileStoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

impl From<std::io::Error> for ProfileStoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Durable record for the identified user.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the stored profile. `None` means no identified user yet.
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// Replace the stored record with `profile`.
    ///
    /// Rejects guest profiles with `GuestNotPersistable`.
    async fn replace(&self, profile: &UserProfile) -> Result<(), ProfileStoreError>;

    /// Remove the stored record. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), ProfileStoreError>;
}
