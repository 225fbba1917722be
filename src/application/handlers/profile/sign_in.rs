//! SignInHandler - Command handler for the guest to identified boundary.

use std::sync::Arc;

use tracing::info;

use super::persist_unless_guest;
use crate::domain::profile::{merge_guest_into, Identity, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Command to sign in.
#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub identity: Identity,
    /// The guest being replaced, if any. Consumed by the handler.
    pub guest: Option<UserProfile>,
}

/// Result of signing in.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub profile: UserProfile,
    /// True when no stored record existed and a fresh one was minted.
    pub created: bool,
    /// Number of guest entries folded in.
    pub merged_logs: usize,
}

/// Handler for signing in.
pub struct SignInHandler {
    store: Arc<dyn ProfileStore>,
}

impl SignInHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, ProfileStoreError> {
        let guest = cmd.guest.filter(|guest| guest.is_guest());
        let merged_logs = guest.as_ref().map(UserProfile::log_count).unwrap_or(0);

        // 1. Load the stored record, or mint one from the identity
        let (base, created) = match self.store.load().await? {
            Some(stored) => (stored, false),
            None => (UserProfile::identified(cmd.identity), true),
        };

        // 2. Nothing to merge into an existing record: no write
        if !created && merged_logs == 0 {
            info!(user_id = %base.id(), points = base.total_points(), "Signed in");
            return Ok(SignInResult {
                profile: base,
                created,
                merged_logs,
            });
        }

        // 3. Merge and persist
        let profile = match guest {
            Some(guest) => merge_guest_into(base, guest),
            None => base,
        };
        persist_unless_guest(self.store.as_ref(), &profile).await?;

        info!(
            user_id = %profile.id(),
            created,
            merged_logs,
            points = profile.total_points(),
            "Signed in"
        );
        Ok(SignInResult {
            profile,
            created,
            merged_logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::foundation::UserId;
    use crate::domain::impact::{fixtures, MainCategory, MediumTag};
    use crate::domain::profile::{save, LogEntry};

    fn identity() -> Identity {
        Identity::new(UserId::new("1").unwrap(), "Eco Warrior", "user@example.com").unwrap()
    }

    fn entry(category: MainCategory, score: u8) -> LogEntry {
        LogEntry::new(MediumTag::Image, fixtures::result(category, score), None)
    }

    fn guest_with_one_log() -> UserProfile {
        save(UserProfile::guest(), entry(MainCategory::Waste, 20))
    }

    #[tokio::test]
    async fn first_sign_in_mints_and_persists() {
        let store = InMemoryProfileStore::new();
        let handler = SignInHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(SignInCommand {
                identity: identity(),
                guest: None,
            })
            .await
            .unwrap();

        assert!(result.created);
        assert!(!result.profile.is_guest());
        assert_eq!(result.profile.name(), "Eco Warrior");
        assert_eq!(store.snapshot().await, Some(result.profile));
    }

    #[tokio::test]
    async fn first_sign_in_carries_guest_history() {
        let store = InMemoryProfileStore::new();
        let handler = SignInHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(SignInCommand {
                identity: identity(),
                guest: Some(guest_with_one_log()),
            })
            .await
            .unwrap();

        assert_eq!(result.merged_logs, 1);
        assert_eq!(result.profile.total_points(), 80);
        assert_eq!(store.snapshot().await.unwrap().log_count(), 1);
    }

    #[tokio::test]
    async fn stored_profile_merges_guest_first() {
        let stored = save(
            UserProfile::identified(identity()),
            entry(MainCategory::Energy, 0),
        );
        assert_eq!(stored.total_points(), 100);
        let store = InMemoryProfileStore::with_profile(stored);
        let handler = SignInHandler::new(Arc::new(store.clone()));
        let guest = guest_with_one_log();
        let guest_log = guest.logs()[0].id();

        let result = handler
            .handle(SignInCommand {
                identity: identity(),
                guest: Some(guest),
            })
            .await
            .unwrap();

        assert!(!result.created);
        assert_eq!(result.profile.total_points(), 180);
        assert_eq!(result.profile.log_count(), 2);
        assert_eq!(result.profile.logs()[0].id(), guest_log);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn empty_guest_does_not_rewrite_stored_profile() {
        let store = InMemoryProfileStore::with_profile(UserProfile::identified(identity()));
        let handler = SignInHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(SignInCommand {
                identity: identity(),
                guest: Some(UserProfile::guest()),
            })
            .await
            .unwrap();

        assert_eq!(result.merged_logs, 0);
        assert_eq!(store.write_count(), 0);
    }
}
