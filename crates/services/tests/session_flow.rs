use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use quiz_core::model::QuizDocument;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{Clock, SessionLoopService, SessionProgress};
use storage::repository::{
    InMemoryStore, SessionSnapshot, SnapshotRepository, StorageError,
};

fn build_quiz() -> QuizDocument {
    serde_json::from_str(
        r#"{
        "title": "Practice Quiz",
        "platform": "GCP",
        "qa": [
            {
                "scenario": "You are sizing a training cluster.",
                "questionText": "Which machine type should you pick?",
                "options": [
                    {"letter": "A", "text": "n1-standard-1"},
                    {"letter": "B", "text": "a2-highgpu-1g"},
                    {"letter": "C", "text": "e2-micro"}
                ],
                "correctAnswers": ["B"],
                "isMultiChoice": false,
                "explanation": "GPU capacity matters here.",
                "wrongExplanation": "The others are underpowered."
            },
            {
                "scenario": "You are designing a feature store.",
                "questionText": "Which two products apply?",
                "options": [
                    {"letter": "A", "text": "Feast"},
                    {"letter": "B", "text": "Sheets"},
                    {"letter": "C", "text": "Vertex AI"},
                    {"letter": "D", "text": "Memcache"}
                ],
                "correctAnswers": ["A", "C"],
                "isMultiChoice": true,
                "explanation": "Both integrate natively.",
                "wrongExplanation": "The rest are not feature stores."
            }
        ]
    }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn session_survives_a_reload() {
    let store = InMemoryStore::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), Arc::new(store.clone()));

    let mut session = loop_svc.start_session(build_quiz()).await.unwrap();
    assert!(!session.is_timing());

    loop_svc.select_option(&mut session, 0, 'B').await;
    assert!(loop_svc.confirm(&mut session, 0).await.unwrap().is_correct);
    loop_svc.next(&mut session).await;
    loop_svc.select_option(&mut session, 1, 'A').await;

    // Simulate a page reload: a new loop over the same store and quiz.
    let restored = loop_svc.start_session(build_quiz()).await.unwrap();
    assert_eq!(restored.current_index(), 1);
    assert_eq!(restored.score(), 1);
    assert!(restored.is_confirmed(0));
    assert_eq!(restored.selection(1), &['A']);
    // Restoring counts as an interaction, so timing resumes.
    assert!(restored.is_timing());
}

#[tokio::test]
async fn reset_discards_the_snapshot() {
    let store = InMemoryStore::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), Arc::new(store.clone()));

    let mut session = loop_svc.start_session(build_quiz()).await.unwrap();
    loop_svc.select_option(&mut session, 0, 'B').await;
    loop_svc.confirm(&mut session, 0).await.unwrap();

    loop_svc.reset(&mut session).await;
    assert_eq!(session.score(), 0);
    assert!(store.load_snapshot(fixed_now()).await.unwrap().is_none());

    let fresh = loop_svc.start_session(build_quiz()).await.unwrap();
    assert_eq!(fresh.score(), 0);
    assert!(!fresh.is_confirmed(0));
    assert!(!fresh.is_timing());
}

#[tokio::test]
async fn snapshot_from_longer_quiz_reconciles() {
    let store = InMemoryStore::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), Arc::new(store.clone()));

    // A snapshot written when the quiz had four questions.
    let stale = SessionSnapshot {
        current_question_index: 3,
        score: 4,
        user_selections: vec![vec!['B'], vec!['A', 'C'], vec!['D'], vec!['A']],
        answered_correctly: vec![true, true, true, true],
        total_seconds: 90,
    };
    store
        .save_snapshot(&stale, fixed_now() + Duration::days(7))
        .await
        .unwrap();

    let session = loop_svc.start_session(build_quiz()).await.unwrap();
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.score(), 2);
    assert_eq!(session.total_questions(), 2);
    assert_eq!(session.elapsed_seconds(), 90);
}

#[tokio::test]
async fn ticks_gate_on_activity() {
    let store = InMemoryStore::new();
    let start = fixed_now();
    let loop_svc = SessionLoopService::new(Clock::fixed(start), Arc::new(store.clone()));

    let mut session = loop_svc.start_session(build_quiz()).await.unwrap();
    // Untouched session: the tick does not accrue.
    assert!(!loop_svc.tick(&mut session).await);

    loop_svc.select_option(&mut session, 0, 'A').await;
    assert!(loop_svc.tick(&mut session).await);
    assert_eq!(session.elapsed_seconds(), 1);

    // After the inactivity limit the watchdog disarms the timer.
    let idle_svc = SessionLoopService::new(
        Clock::fixed(start + Duration::seconds(240)),
        Arc::new(store.clone()),
    );
    assert!(!idle_svc.tick(&mut session).await);
    assert_eq!(session.elapsed_seconds(), 1);

    // One interaction re-arms it.
    idle_svc.select_option(&mut session, 0, 'B').await;
    assert!(idle_svc.tick(&mut session).await);
    assert_eq!(session.elapsed_seconds(), 2);
}

#[tokio::test]
async fn elapsed_time_is_persisted() {
    let store = InMemoryStore::new();
    let loop_svc = SessionLoopService::new(fixed_clock(), Arc::new(store.clone()));

    let mut session = loop_svc.start_session(build_quiz()).await.unwrap();
    loop_svc.select_option(&mut session, 0, 'A').await;
    loop_svc.tick(&mut session).await;
    loop_svc.tick(&mut session).await;

    let snapshot = store.load_snapshot(fixed_now()).await.unwrap().unwrap();
    assert_eq!(snapshot.total_seconds, 2);
}

/// Store that fails every write, for exercising the best-effort contract.
#[derive(Clone, Default)]
struct FailingStore;

#[async_trait]
impl SnapshotRepository for FailingStore {
    async fn save_snapshot(
        &self,
        _snapshot: &SessionSnapshot,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk on fire".into()))
    }

    async fn load_snapshot(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        Err(StorageError::Connection("disk on fire".into()))
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk on fire".into()))
    }
}

#[tokio::test]
async fn persistence_failures_never_reach_the_session() {
    let loop_svc = SessionLoopService::new(fixed_clock(), Arc::new(FailingStore));

    // Load failure falls back to a fresh session.
    let mut session = loop_svc.start_session(build_quiz()).await.unwrap();

    // Write failures are swallowed; in-memory state still mutates.
    assert!(loop_svc.select_option(&mut session, 0, 'B').await);
    assert!(loop_svc.confirm(&mut session, 0).await.unwrap().is_correct);
    loop_svc.reset(&mut session).await;
    assert_eq!(session.score(), 0);

    let progress = SessionProgress::from_session(&session);
    assert_eq!(progress.answered, 0);
    assert_eq!(progress.total, 2);
}
