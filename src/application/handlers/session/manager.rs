//! AnalysisSessionManager - drives captured media through analysis and
//! visualization, one live session per actor.
//!
//! Every session carries a monotonic `SessionId`. Collaborator calls run
//! outside the session lock and, when they resolve, their outcome is only
//! applied if the actor's live session still has the same id. Anything else
//! is a stale response and is dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::domain::impact::{AnalysisResult, CapturedMedia, CarbonScore};
use crate::domain::profile::LogEntry;
use crate::domain::session::{AnalysisSession, SessionError, SessionSnapshot};
use crate::ports::{AnalysisError, ImpactAnalyzer, VisualizationError, Visualizer};

/// Default limit on a single analysis call.
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(120);

/// Default limit on a single visualization call.
pub const DEFAULT_VISUALIZATION_TIMEOUT: Duration = Duration::from_secs(120);

type SessionMap = Arc<Mutex<HashMap<UserId, AnalysisSession>>>;

/// Result of a successful `submit`.
#[derive(Debug)]
pub struct Submission {
    /// The session right after analysis, awaiting its illustration.
    pub snapshot: SessionSnapshot,
    /// The visualization running in the background.
    pub visualization: VisualizationTask,
}

/// How a background visualization ended.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualizationOutcome {
    /// The image was attached to the still-live session.
    Attached(SessionSnapshot),
    /// Generation failed; the session stays committable without a badge.
    Failed(SessionSnapshot),
    /// The session was committed, discarded or replaced first.
    Stale,
}

/// Handle to a background visualization.
///
/// Dropping it detaches the task; the outcome is still applied (or dropped
/// as stale) when the call resolves.
#[derive(Debug)]
pub struct VisualizationTask {
    session_id: SessionId,
    handle: JoinHandle<Result<VisualizationOutcome, SessionError>>,
}

impl VisualizationTask {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Waits for the visualization to resolve.
    pub async fn wait(self) -> Result<VisualizationOutcome, SessionError> {
        self.handle.await.map_err(|e| {
            SessionError::infrastructure(format!("visualization task ended abnormally: {}", e))
        })?
    }
}

/// Owns the live analysis sessions.
pub struct AnalysisSessionManager {
    analyzer: Arc<dyn ImpactAnalyzer>,
    visualizer: Arc<dyn Visualizer>,
    sessions: SessionMap,
    next_tag: AtomicU64,
    analysis_timeout: Duration,
    visualization_timeout: Duration,
}

impl AnalysisSessionManager {
    pub fn new(analyzer: Arc<dyn ImpactAnalyzer>, visualizer: Arc<dyn Visualizer>) -> Self {
        Self {
            analyzer,
            visualizer,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_tag: AtomicU64::new(0),
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            visualization_timeout: DEFAULT_VISUALIZATION_TIMEOUT,
        }
    }

    /// Sets the per-call limits imposed on the collaborators.
    pub fn with_timeouts(mut self, analysis: Duration, visualization: Duration) -> Self {
        self.analysis_timeout = analysis;
        self.visualization_timeout = visualization;
        self
    }

    /// Submits media for `owner` and runs the analysis.
    ///
    /// On success the session awaits its illustration, which is generated
    /// in the background. A terminal session left over from an earlier
    /// submission is replaced.
    ///
    /// # Errors
    ///
    /// - `InFlight` if `owner` already has a session waiting on analysis
    /// - `Analysis` if the engine failed or broke the result contract; the
    ///   session is gone and `owner` is idle again
    /// - `Superseded` if the session was discarded during the call
    pub async fn submit(
        &self,
        owner: &UserId,
        media: CapturedMedia,
    ) -> Result<Submission, SessionError> {
        let (session_id, media) = self.open_session(owner, media).await?;
        let medium = media.medium();
        info!(
            session_id = %session_id,
            user_id = %owner,
            medium = %medium,
            bytes = media.len(),
            "Analysis started"
        );

        let outcome = self
            .run_analysis(&media)
            .await
            .and_then(|result| result.validated_for(medium).map_err(AnalysisError::from));
        drop(media);

        let mut sessions = self.sessions.lock().await;
        let session = match sessions.get_mut(owner) {
            Some(session) if session.id() == session_id => session,
            _ => {
                debug!(session_id = %session_id, "Dropping analysis outcome for superseded session");
                return Err(SessionError::Superseded(session_id));
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                session.record_analysis_failure()?;
                sessions.remove(owner);
                warn!(session_id = %session_id, user_id = %owner, error = %err, "Analysis failed");
                return Err(SessionError::Analysis(err));
            }
        };

        let summary = result.summary.clone();
        let score = result.total_carbon_score;
        let category = result.main_category;
        session.record_analysis(result)?;
        let snapshot = session.snapshot();
        drop(sessions);

        info!(
            session_id = %session_id,
            category = %category,
            score = score.value(),
            "Analysis complete"
        );

        let visualization = self.spawn_visualization(owner.clone(), session_id, summary, score);
        Ok(Submission {
            snapshot,
            visualization,
        })
    }

    /// Ends `owner`'s session and returns its log entry.
    ///
    /// Allowed once an analysis result exists, with or without an
    /// illustration. An illustration still being generated is dropped.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if `owner` has no session
    /// - `NotCommittable` while the analysis is still running
    pub async fn commit(&self, owner: &UserId) -> Result<LogEntry, SessionError> {
        let (entry, ()) = self
            .commit_with(owner, |_| async { Ok::<(), SessionError>(()) })
            .await?;
        Ok(entry)
    }

    /// Ends `owner`'s session once `persist` has accepted its log entry.
    ///
    /// The session lock is held across `persist`. If it fails, the session
    /// stays live and committable, so saving can be retried without paying
    /// for another analysis.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if `owner` has no session
    /// - `NotCommittable` while the analysis is still running
    /// - whatever `persist` fails with, converted into `SessionError`
    pub async fn commit_with<T, E, F, Fut>(
        &self,
        owner: &UserId,
        persist: F,
    ) -> Result<(LogEntry, T), SessionError>
    where
        F: FnOnce(LogEntry) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        SessionError: From<E>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get(owner).ok_or(SessionError::NoActiveSession)?;
        let status = session.status();
        if !status.is_committable() {
            return Err(SessionError::NotCommittable(status));
        }
        let session_id = session.id();
        let entry = session.draft_entry_at(Timestamp::now())?;

        let accepted = match persist(entry.clone()).await {
            Ok(accepted) => accepted,
            Err(err) => {
                let err = SessionError::from(err);
                warn!(
                    session_id = %session_id,
                    user_id = %owner,
                    error = %err,
                    "Commit not accepted, session kept"
                );
                return Err(err);
            }
        };

        if let Some(session) = sessions.remove(owner) {
            session.close_committed()?;
        }
        drop(sessions);

        info!(
            session_id = %session_id,
            user_id = %owner,
            log_id = %entry.id(),
            points = entry.points_earned(),
            badge = entry.is_badge(),
            "Session committed"
        );
        Ok((entry, accepted))
    }

    /// Drops `owner`'s session without touching the profile.
    ///
    /// Any call still outstanding for it resolves as stale.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if `owner` has no session
    pub async fn discard(&self, owner: &UserId) -> Result<SessionId, SessionError> {
        let session = self
            .sessions
            .lock()
            .await
            .remove(owner)
            .ok_or(SessionError::NoActiveSession)?;
        let status = session.status();
        let session_id = session.discard()?;
        info!(session_id = %session_id, user_id = %owner, status = %status, "Session discarded");
        Ok(session_id)
    }

    /// Current view of `owner`'s session, if any.
    pub async fn snapshot(&self, owner: &UserId) -> Option<SessionSnapshot> {
        self.sessions
            .lock()
            .await
            .get(owner)
            .map(AnalysisSession::snapshot)
    }

    async fn open_session(
        &self,
        owner: &UserId,
        media: CapturedMedia,
    ) -> Result<(SessionId, CapturedMedia), SessionError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(existing) = sessions.get(owner) {
            if existing.is_in_flight() {
                return Err(SessionError::InFlight(existing.id()));
            }
        }

        let session_id = SessionId::from_raw(self.next_tag.fetch_add(1, Ordering::SeqCst) + 1);
        let mut session = AnalysisSession::submit(session_id, owner.clone(), media);
        let media = session.begin_analysis()?;
        if let Some(previous) = sessions.insert(owner.clone(), session) {
            debug!(session_id = %previous.id(), status = %previous.status(), "Replaced finished session");
        }
        Ok((session_id, media))
    }

    async fn run_analysis(&self, media: &CapturedMedia) -> Result<AnalysisResult, AnalysisError> {
        let mime_hint = media.mime_hint();
        match timeout(
            self.analysis_timeout,
            self.analyzer.analyze(media.content(), &mime_hint),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(AnalysisError::timeout(whole_secs(self.analysis_timeout))),
        }
    }

    fn spawn_visualization(
        &self,
        owner: UserId,
        session_id: SessionId,
        summary: String,
        score: CarbonScore,
    ) -> VisualizationTask {
        let handle = tokio::spawn(visualize_and_apply(
            Arc::clone(&self.visualizer),
            Arc::clone(&self.sessions),
            self.visualization_timeout,
            owner,
            session_id,
            summary,
            score,
        ));
        VisualizationTask { session_id, handle }
    }
}

/// Limit reported in whole seconds, rounded up so sub-second limits never read as zero.
fn whole_secs(limit: Duration) -> u32 {
    let secs = limit.as_secs() + u64::from(limit.subsec_nanos() > 0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

async fn visualize_and_apply(
    visualizer: Arc<dyn Visualizer>,
    sessions: SessionMap,
    limit: Duration,
    owner: UserId,
    session_id: SessionId,
    summary: String,
    score: CarbonScore,
) -> Result<VisualizationOutcome, SessionError> {
    let outcome = match timeout(limit, visualizer.visualize(&summary, score)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(VisualizationError::timeout(whole_secs(limit))),
    };

    let mut sessions = sessions.lock().await;
    let session = match sessions.get_mut(&owner) {
        Some(session) if session.id() == session_id => session,
        _ => {
            debug!(session_id = %session_id, "Dropping visualization for superseded session");
            return Ok(VisualizationOutcome::Stale);
        }
    };

    match outcome {
        Ok(image) => {
            session.record_visualization(image)?;
            info!(session_id = %session_id, "Visualization attached");
            Ok(VisualizationOutcome::Attached(session.snapshot()))
        }
        Err(err) => {
            session.record_visualization_failure()?;
            warn!(session_id = %session_id, error = %err, "Visualization failed, continuing without image");
            Ok(VisualizationOutcome::Failed(session.snapshot()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockImpactAnalyzer, MockVisualizer};
    use crate::domain::impact::{fixtures, BoundingBox, ImageHandle, MainCategory, MediumTag};
    use crate::domain::session::SessionStatus;

    fn owner() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn photo() -> CapturedMedia {
        CapturedMedia::new(vec![0xFF, 0xD8, 0xFF, 0xE0], MediumTag::Image)
    }

    fn manager(analyzer: MockImpactAnalyzer, visualizer: MockVisualizer) -> AnalysisSessionManager {
        AnalysisSessionManager::new(Arc::new(analyzer), Arc::new(visualizer))
    }

    #[tokio::test]
    async fn submit_analyzes_then_visualizes() {
        let analyzer = MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Waste, 20));
        let visualizer = MockVisualizer::new();
        let manager = manager(analyzer.clone(), visualizer.clone());

        let submission = manager.submit(&owner(), photo()).await.unwrap();
        assert_eq!(submission.snapshot.status, SessionStatus::AwaitingVisualization);
        assert!(!submission.snapshot.badge_available());

        let outcome = submission.visualization.wait().await.unwrap();
        let VisualizationOutcome::Attached(snapshot) = outcome else {
            panic!("expected attached visualization");
        };
        assert_eq!(snapshot.status, SessionStatus::Visualized);
        assert!(snapshot.badge_available());

        assert_eq!(analyzer.get_calls()[0].mime_hint, "image/jpeg");
        let calls = visualizer.get_calls();
        assert_eq!(calls[0].summary, "Waste activity");
        assert_eq!(calls[0].score.value(), 20);
    }

    #[tokio::test]
    async fn commit_after_visualization_is_a_badge() {
        let manager = manager(
            MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Food, 30)),
            MockVisualizer::new(),
        );
        let submission = manager.submit(&owner(), photo()).await.unwrap();
        submission.visualization.wait().await.unwrap();

        let entry = manager.commit(&owner()).await.unwrap();

        assert!(entry.is_badge());
        assert_eq!(entry.points_earned(), 70);
        assert!(manager.snapshot(&owner()).await.is_none());
    }

    #[tokio::test]
    async fn analysis_failure_returns_to_idle() {
        let manager = manager(
            MockImpactAnalyzer::new().with_error(MockError::Network {
                message: "connection reset".to_string(),
            }),
            MockVisualizer::new(),
        );

        let err = manager.submit(&owner(), photo()).await.unwrap_err();

        assert!(matches!(err, SessionError::Analysis(AnalysisError::Network(_))));
        assert!(manager.snapshot(&owner()).await.is_none());
        assert!(matches!(
            manager.commit(&owner()).await,
            Err(SessionError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn analysis_failure_releases_media() {
        let manager = manager(
            MockImpactAnalyzer::new().with_error(MockError::Unavailable {
                message: "overloaded".to_string(),
            }),
            MockVisualizer::new(),
        );
        let media = photo();
        let weak = Arc::downgrade(&media.shared_content());

        manager.submit(&owner(), media).await.unwrap_err();

        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn out_of_contract_result_is_rejected() {
        let mut result = fixtures::result(MainCategory::Waste, 20);
        let mut item = fixtures::item("2", 10.0);
        item.bounding_box = Some(BoundingBox {
            ymin: 0.9,
            xmin: 0.1,
            ymax: 0.2,
            xmax: 0.5,
        });
        result.items.push(item);
        let manager = manager(MockImpactAnalyzer::new().with_result(result), MockVisualizer::new());

        let err = manager.submit(&owner(), photo()).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Analysis(AnalysisError::ContractViolation(_))
        ));
        assert!(manager.snapshot(&owner()).await.is_none());
    }

    #[tokio::test]
    async fn analysis_timeout_is_a_failure() {
        let manager = manager(
            MockImpactAnalyzer::new().with_delay(Duration::from_millis(200)),
            MockVisualizer::new(),
        )
        .with_timeouts(Duration::from_millis(20), DEFAULT_VISUALIZATION_TIMEOUT);

        let err = manager.submit(&owner(), photo()).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Analysis(AnalysisError::Timeout { timeout_secs: 1 })
        ));
        assert!(manager.snapshot(&owner()).await.is_none());
    }

    #[test]
    fn sub_second_limits_round_up() {
        assert_eq!(whole_secs(Duration::from_millis(20)), 1);
        assert_eq!(whole_secs(Duration::from_secs(120)), 120);
        assert_eq!(whole_secs(Duration::from_millis(1500)), 2);
        assert_eq!(whole_secs(Duration::ZERO), 0);
    }

    #[tokio::test]
    async fn rejected_commit_keeps_the_session() {
        let analyzer = MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Waste, 20));
        let manager = manager(analyzer.clone(), MockVisualizer::new());
        let me = owner();
        manager.submit(&me, photo()).await.unwrap().visualization.wait().await.unwrap();

        let err = manager
            .commit_with(&me, |_| async {
                Err::<(), _>(crate::ports::ProfileStoreError::io("disk full"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));

        let snapshot = manager.snapshot(&me).await.unwrap();
        assert_eq!(snapshot.status, SessionStatus::Visualized);

        let (entry, points) = manager
            .commit_with(&me, |entry| async move { Ok::<_, SessionError>(entry.points_earned()) })
            .await
            .unwrap();
        assert_eq!(points, 80);
        assert!(entry.is_badge());
        assert!(manager.snapshot(&me).await.is_none());
        assert_eq!(analyzer.call_count(), 1);
    }

    #[tokio::test]
    async fn second_submit_while_analyzing_is_rejected() {
        let manager = Arc::new(manager(
            MockImpactAnalyzer::new().with_delay(Duration::from_millis(200)),
            MockVisualizer::new(),
        ));
        let background = Arc::clone(&manager);
        let first = tokio::spawn(async move {
            let me = owner();
            background.submit(&me, photo()).await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = manager.submit(&owner(), photo()).await.unwrap_err();
        assert!(matches!(err, SessionError::InFlight(_)));
        assert_eq!(err.code(), crate::domain::foundation::ErrorCode::SessionInFlight);

        assert!(first.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn different_actors_do_not_block_each_other() {
        let manager = Arc::new(manager(
            MockImpactAnalyzer::new().with_delay(Duration::from_millis(100)),
            MockVisualizer::new(),
        ));
        let me = owner();
        let other = UserId::new("user-2").unwrap();

        let (a, b) = tokio::join!(
            manager.submit(&me, photo()),
            manager.submit(&other, CapturedMedia::text("Cycled to work"))
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn commit_while_analyzing_is_not_committable() {
        let manager = Arc::new(manager(
            MockImpactAnalyzer::new().with_delay(Duration::from_millis(200)),
            MockVisualizer::new(),
        ));
        let background = Arc::clone(&manager);
        let pending = tokio::spawn(async move { background.submit(&owner(), photo()).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = manager.commit(&owner()).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotCommittable(SessionStatus::Analyzing)
        ));

        assert!(pending.await.unwrap().is_ok());
        assert!(manager.commit(&owner()).await.is_ok());
    }

    #[tokio::test]
    async fn discard_during_analysis_supersedes_the_call() {
        let manager = Arc::new(manager(
            MockImpactAnalyzer::new().with_delay(Duration::from_millis(200)),
            MockVisualizer::new(),
        ));
        let background = Arc::clone(&manager);
        let pending = tokio::spawn(async move { background.submit(&owner(), photo()).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let discarded = manager.discard(&owner()).await.unwrap();

        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, SessionError::Superseded(id) if id == discarded));
        assert!(manager.snapshot(&owner()).await.is_none());
    }

    #[tokio::test]
    async fn commit_before_visualization_drops_the_late_image() {
        let manager = manager(
            MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Transport, 40)),
            MockVisualizer::new().with_delay(Duration::from_millis(200)),
        );
        let submission = manager.submit(&owner(), photo()).await.unwrap();

        let entry = manager.commit(&owner()).await.unwrap();
        assert!(entry.visualization().is_none());

        let outcome = submission.visualization.wait().await.unwrap();
        assert_eq!(outcome, VisualizationOutcome::Stale);
        assert!(manager.snapshot(&owner()).await.is_none());
    }

    #[tokio::test]
    async fn late_image_never_reaches_a_newer_session() {
        let manager = manager(
            MockImpactAnalyzer::new()
                .with_result(fixtures::result(MainCategory::Waste, 20))
                .with_result(fixtures::result(MainCategory::Food, 60)),
            MockVisualizer::new()
                .with_delay(Duration::from_millis(200))
                .with_image(ImageHandle::data_uri("image/png", "Zmlyc3Q=")),
        );
        let first = manager.submit(&owner(), photo()).await.unwrap();
        manager.discard(&owner()).await.unwrap();

        let second = manager
            .submit(&owner(), CapturedMedia::text("Vegan lunch"))
            .await
            .unwrap();
        assert_ne!(first.snapshot.id, second.snapshot.id);

        assert_eq!(
            first.visualization.wait().await.unwrap(),
            VisualizationOutcome::Stale
        );
        second.visualization.wait().await.unwrap();

        let current = manager.snapshot(&owner()).await.unwrap();
        assert_eq!(current.id, second.snapshot.id);
        let image = current.visualization.unwrap();
        assert!(!image.as_str().ends_with("Zmlyc3Q="));
    }

    #[tokio::test]
    async fn visualization_failure_is_non_fatal() {
        let manager = manager(
            MockImpactAnalyzer::new().with_result(fixtures::result(MainCategory::Energy, 55)),
            MockVisualizer::new().with_error(MockError::NoImage),
        );
        let submission = manager.submit(&owner(), photo()).await.unwrap();

        let outcome = submission.visualization.wait().await.unwrap();
        let VisualizationOutcome::Failed(snapshot) = outcome else {
            panic!("expected failed visualization");
        };
        assert_eq!(snapshot.status, SessionStatus::VisualizationFailed);
        assert!(snapshot.is_committable());

        let entry = manager.commit(&owner()).await.unwrap();
        assert!(!entry.is_badge());
        assert_eq!(entry.points_earned(), 45);
    }

    #[tokio::test]
    async fn new_submit_replaces_a_finished_session() {
        let manager = manager(MockImpactAnalyzer::new(), MockVisualizer::new());
        let first = manager.submit(&owner(), photo()).await.unwrap();
        first.visualization.wait().await.unwrap();

        let second = manager.submit(&owner(), photo()).await.unwrap();

        assert_ne!(first.snapshot.id, second.snapshot.id);
        assert_eq!(
            manager.snapshot(&owner()).await.unwrap().id,
            second.snapshot.id
        );
    }

    #[tokio::test]
    async fn discard_releases_media_and_changes_nothing_else() {
        let manager = manager(MockImpactAnalyzer::new(), MockVisualizer::new());
        let media = photo();
        let weak = Arc::downgrade(&media.shared_content());

        let submission = manager.submit(&owner(), media).await.unwrap();
        submission.visualization.wait().await.unwrap();
        manager.discard(&owner()).await.unwrap();

        assert!(weak.upgrade().is_none());
        assert!(matches!(
            manager.discard(&owner()).await,
            Err(SessionError::NoActiveSession)
        ));
    }
}
