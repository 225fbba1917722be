//! SaveLogHandler - Command handler for adding a log entry to a profile.

use std::sync::Arc;

use tracing::info;

use super::persist_unless_guest;
use crate::domain::profile::{save, LogEntry, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Command to save an entry.
#[derive(Debug, Clone)]
pub struct SaveLogCommand {
    pub profile: UserProfile,
    pub entry: LogEntry,
}

/// Result of saving an entry.
#[derive(Debug, Clone)]
pub struct SaveLogResult {
    pub profile: UserProfile,
    pub persisted: bool,
}

/// Handler for saving entries.
pub struct SaveLogHandler {
    store: Arc<dyn ProfileStore>,
}

impl SaveLogHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: SaveLogCommand) -> Result<SaveLogResult, ProfileStoreError> {
        let log_id = cmd.entry.id();
        let earned = cmd.entry.points_earned();
        let profile = save(cmd.profile, cmd.entry);
        let persisted = persist_unless_guest(self.store.as_ref(), &profile).await?;

        info!(
            user_id = %profile.id(),
            log_id = %log_id,
            earned,
            points = profile.total_points(),
            "Log entry saved"
        );
        Ok(SaveLogResult { profile, persisted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::foundation::UserId;
    use crate::domain::impact::{fixtures, MainCategory, MediumTag};
    use crate::domain::profile::Identity;

    fn entry(score: u8) -> LogEntry {
        LogEntry::new(
            MediumTag::Text,
            fixtures::result(MainCategory::Transport, score),
            None,
        )
    }

    #[tokio::test]
    async fn identified_save_is_persisted() {
        let store = InMemoryProfileStore::new();
        let handler = SaveLogHandler::new(Arc::new(store.clone()));
        let profile = UserProfile::identified(
            Identity::new(UserId::new("user-1").unwrap(), "Eco Warrior", "").unwrap(),
        );

        let result = handler
            .handle(SaveLogCommand {
                profile,
                entry: entry(95),
            })
            .await
            .unwrap();

        assert!(result.persisted);
        assert_eq!(result.profile.total_points(), 10);
        assert_eq!(store.snapshot().await.unwrap().total_points(), 10);
    }

    #[tokio::test]
    async fn guest_save_stays_in_memory() {
        let store = InMemoryProfileStore::new();
        let handler = SaveLogHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(SaveLogCommand {
                profile: UserProfile::guest(),
                entry: entry(20),
            })
            .await
            .unwrap();

        assert!(!result.persisted);
        assert_eq!(result.profile.total_points(), 80);
        assert!(store.snapshot().await.is_none());
    }
}
