//! CommitSessionHandler - Command handler for saving an analyzed session.

use std::sync::Arc;

use tracing::info;

use super::AnalysisSessionManager;
use crate::application::handlers::profile::persist_unless_guest;
use crate::domain::profile::{save, LogEntry, UserProfile};
use crate::domain::session::SessionError;
use crate::ports::{ProfileStore, ProfileStoreError};

/// Command to commit the actor's live session into their profile.
#[derive(Debug, Clone)]
pub struct CommitSessionCommand {
    /// Current profile; its id identifies the actor.
    pub profile: UserProfile,
}

/// Result of a successful commit.
#[derive(Debug, Clone)]
pub struct CommitSessionResult {
    pub entry: LogEntry,
    pub profile: UserProfile,
    /// False for guests, whose profile never reaches the store.
    pub persisted: bool,
}

/// Handler for committing sessions.
pub struct CommitSessionHandler {
    sessions: Arc<AnalysisSessionManager>,
    store: Arc<dyn ProfileStore>,
}

impl CommitSessionHandler {
    pub fn new(sessions: Arc<AnalysisSessionManager>, store: Arc<dyn ProfileStore>) -> Self {
        Self { sessions, store }
    }

    pub async fn handle(
        &self,
        cmd: CommitSessionCommand,
    ) -> Result<CommitSessionResult, SessionError> {
        // 1. Credit the drafted entry and replace the record unless guest.
        //    The session only ends once this succeeds.
        let owner = cmd.profile.id().clone();
        let store = self.store.as_ref();
        let (entry, (profile, persisted)) = self
            .sessions
            .commit_with(&owner, |entry| async move {
                let profile = save(cmd.profile, entry);
                let persisted = persist_unless_guest(store, &profile).await?;
                Ok::<_, ProfileStoreError>((profile, persisted))
            })
            .await?;

        info!(
            user_id = %profile.id(),
            log_id = %entry.id(),
            points = profile.total_points(),
            persisted,
            "Entry saved to profile"
        );

        Ok(CommitSessionResult {
            entry,
            profile,
            persisted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::adapters::ai::{MockImpactAnalyzer, MockVisualizer};
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::foundation::UserId;
    use crate::domain::impact::{fixtures, CapturedMedia, MainCategory, MediumTag};
    use crate::domain::profile::Identity;

    fn handler(store: InMemoryProfileStore) -> (CommitSessionHandler, Arc<AnalysisSessionManager>) {
        let manager = Arc::new(AnalysisSessionManager::new(
            Arc::new(
                MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Waste, 20)),
            ),
            Arc::new(MockVisualizer::new()),
        ));
        (
            CommitSessionHandler::new(Arc::clone(&manager), Arc::new(store)),
            manager,
        )
    }

    fn photo() -> CapturedMedia {
        CapturedMedia::new(vec![0xFF, 0xD8], MediumTag::Image)
    }

    #[tokio::test]
    async fn guest_commit_is_not_persisted() {
        let store = InMemoryProfileStore::new();
        let (handler, manager) = handler(store.clone());
        let guest = UserProfile::guest();
        manager.submit(guest.id(), photo()).await.unwrap();

        let result = handler
            .handle(CommitSessionCommand { profile: guest })
            .await
            .unwrap();

        assert!(!result.persisted);
        assert_eq!(result.entry.points_earned(), 80);
        assert_eq!(result.profile.total_points(), 80);
        assert_eq!(result.profile.log_count(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn identified_commit_replaces_the_record() {
        let store = InMemoryProfileStore::new();
        let (handler, manager) = handler(store.clone());
        let profile = UserProfile::identified(
            Identity::new(UserId::new("user-1").unwrap(), "Eco Warrior", "").unwrap(),
        );
        manager.submit(profile.id(), photo()).await.unwrap();

        let result = handler
            .handle(CommitSessionCommand { profile })
            .await
            .unwrap();

        assert!(result.persisted);
        assert_eq!(store.snapshot().await, Some(result.profile));
    }

    /// Fails the first `replace`, then delegates.
    struct FlakyStore {
        inner: InMemoryProfileStore,
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl ProfileStore for FlakyStore {
        async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError> {
            self.inner.load().await
        }

        async fn replace(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failing {
                return Err(ProfileStoreError::io("disk full"));
            }
            self.inner.replace(profile).await
        }

        async fn clear(&self) -> Result<(), ProfileStoreError> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn failed_write_keeps_the_session_for_a_retry() {
        let inner = InMemoryProfileStore::new();
        let analyzer =
            MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Waste, 20));
        let manager = Arc::new(AnalysisSessionManager::new(
            Arc::new(analyzer.clone()),
            Arc::new(MockVisualizer::new()),
        ));
        let handler = CommitSessionHandler::new(
            Arc::clone(&manager),
            Arc::new(FlakyStore {
                inner: inner.clone(),
                failures_left: AtomicUsize::new(1),
            }),
        );
        let profile = UserProfile::identified(
            Identity::new(UserId::new("user-1").unwrap(), "Eco Warrior", "").unwrap(),
        );
        manager.submit(profile.id(), photo()).await.unwrap();

        let err = handler
            .handle(CommitSessionCommand {
                profile: profile.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(manager
            .snapshot(profile.id())
            .await
            .is_some_and(|snapshot| snapshot.is_committable()));
        assert_eq!(inner.write_count(), 0);

        let result = handler
            .handle(CommitSessionCommand { profile })
            .await
            .unwrap();
        assert!(result.persisted);
        assert_eq!(result.profile.total_points(), 80);
        assert_eq!(inner.snapshot().await, Some(result.profile.clone()));
        assert!(manager.snapshot(result.profile.id()).await.is_none());
        assert_eq!(analyzer.call_count(), 1);
    }

    #[tokio::test]
    async fn nothing_to_commit() {
        let store = InMemoryProfileStore::new();
        let (handler, _manager) = handler(store.clone());

        let err = handler
            .handle(CommitSessionCommand {
                profile: UserProfile::guest(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::NoActiveSession));
        assert_eq!(store.write_count(), 0);
    }
}
