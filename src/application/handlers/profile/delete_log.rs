//! DeleteLogHandler - Command handler for removing a log entry.

use std::sync::Arc;

use tracing::{debug, info};

use super::persist_unless_guest;
use crate::domain::foundation::LogEntryId;
use crate::domain::profile::{delete, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Command to delete an entry.
#[derive(Debug, Clone)]
pub struct DeleteLogCommand {
    pub profile: UserProfile,
    pub log_id: LogEntryId,
}

/// Result of deleting an entry.
#[derive(Debug, Clone)]
pub struct DeleteLogResult {
    pub profile: UserProfile,
    /// False when the id was unknown and nothing changed.
    pub removed: bool,
    pub persisted: bool,
}

/// Handler for deleting entries.
pub struct DeleteLogHandler {
    store: Arc<dyn ProfileStore>,
}

impl DeleteLogHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: DeleteLogCommand,
    ) -> Result<DeleteLogResult, ProfileStoreError> {
        let before = cmd.profile.log_count();
        let profile = delete(cmd.profile, cmd.log_id);

        if profile.log_count() == before {
            debug!(user_id = %profile.id(), log_id = %cmd.log_id, "No such log entry, nothing to delete");
            return Ok(DeleteLogResult {
                profile,
                removed: false,
                persisted: false,
            });
        }

        let persisted = persist_unless_guest(self.store.as_ref(), &profile).await?;
        info!(
            user_id = %profile.id(),
            log_id = %cmd.log_id,
            points = profile.total_points(),
            "Log entry deleted"
        );
        Ok(DeleteLogResult {
            profile,
            removed: true,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::foundation::UserId;
    use crate::domain::impact::{fixtures, MainCategory, MediumTag};
    use crate::domain::profile::{save, Identity, LogEntry};

    fn profile_with_entry() -> (UserProfile, LogEntryId) {
        let entry = LogEntry::new(
            MediumTag::Image,
            fixtures::result(MainCategory::Waste, 20),
            None,
        );
        let id = entry.id();
        let profile = save(
            UserProfile::identified(
                Identity::new(UserId::new("user-1").unwrap(), "Eco Warrior", "").unwrap(),
            ),
            entry,
        );
        (profile, id)
    }

    #[tokio::test]
    async fn delete_debits_and_persists() {
        let store = InMemoryProfileStore::new();
        let handler = DeleteLogHandler::new(Arc::new(store.clone()));
        let (profile, id) = profile_with_entry();

        let result = handler
            .handle(DeleteLogCommand {
                profile,
                log_id: id,
            })
            .await
            .unwrap();

        assert!(result.removed);
        assert!(result.persisted);
        assert_eq!(result.profile.total_points(), 0);
        assert_eq!(store.snapshot().await.unwrap().log_count(), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_a_no_op_without_write() {
        let store = InMemoryProfileStore::new();
        let handler = DeleteLogHandler::new(Arc::new(store.clone()));
        let (profile, _) = profile_with_entry();

        let result = handler
            .handle(DeleteLogCommand {
                profile: profile.clone(),
                log_id: LogEntryId::new(),
            })
            .await
            .unwrap();

        assert!(!result.removed);
        assert_eq!(result.profile, profile);
        assert_eq!(store.write_count(), 0);
    }
}
