//! In-Memory Profile Store Adapter
//!
//! Holds the profile record in memory. Useful for testing and development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::profile::UserProfile;
use crate::ports::{ProfileStore, ProfileStoreError};

/// In-memory storage for the profile record
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    record: Arc<RwLock<Option<UserProfile>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `profile`
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            record: Arc::new(RwLock::new(Some(profile))),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of successful `replace` calls (useful for tests)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Peek at the stored record without going through the port
    pub async fn snapshot(&self) -> Option<UserProfile> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError> {
        Ok(self.record.read().await.clone())
    }

    async fn replace(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        if profile.is_guest() {
            return Err(ProfileStoreError::GuestNotPersistable(profile.id().clone()));
        }
        *self.record.write().await = Some(profile.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), ProfileStoreError> {
        *self.record.write().await = None;
        Ok(())
    }
}
