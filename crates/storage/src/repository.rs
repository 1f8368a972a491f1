use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::model::{Question, QuizSession, QuizSessionError};

/// Key under which the quiz session snapshot is stored.
pub const SESSION_SNAPSHOT_KEY: &str = "quizState";

/// Key under which the consent acknowledgment flag is stored.
pub const CONSENT_KEY: &str = "gdprAccepted";

/// Retention window for session snapshots.
pub const SNAPSHOT_TTL_DAYS: i64 = 7;

/// Retention window for the consent acknowledgment.
pub const CONSENT_TTL_DAYS: i64 = 365;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape of an in-progress quiz session.
///
/// This is the external snapshot contract: camelCase field names, with every
/// field defaulted so a partial or stale blob still deserializes. Timing
/// armed-state is not persisted; a restored session re-arms on the first
/// interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub user_selections: Vec<Vec<char>>,
    #[serde(default)]
    pub answered_correctly: Vec<bool>,
    #[serde(default)]
    pub total_seconds: u64,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            current_question_index: session.current_index(),
            score: session.score(),
            user_selections: session.selections().to_vec(),
            answered_correctly: session.confirmed_flags().to_vec(),
            total_seconds: session.elapsed_seconds(),
        }
    }

    /// Rehydrate a session over freshly loaded questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if the question list is empty; any
    /// shape mismatch between snapshot and questions is reconciled, not
    /// rejected.
    pub fn into_session(self, questions: Vec<Question>) -> Result<QuizSession, QuizSessionError> {
        QuizSession::from_persisted(
            questions,
            self.current_question_index,
            self.score,
            self.user_selections,
            self.answered_correctly,
            self.total_seconds,
        )
    }
}

/// Repository contract for the session snapshot.
///
/// Expiry timestamps are passed in by the caller so the storage layer stays
/// free of its own time source. Expired and unparsable entries both load as
/// absent; they are never an error.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Persist the snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(
        &self,
        snapshot: &SessionSnapshot,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Fetch the snapshot, if one is stored and not expired.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for storage-level failures; a missing,
    /// expired, or malformed snapshot is `Ok(None)`.
    async fn load_snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Remove the snapshot. A no-op when none is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal fails.
    async fn clear_snapshot(&self) -> Result<(), StorageError>;
}

/// Repository contract for the consent acknowledgment flag.
#[async_trait]
pub trait ConsentRepository: Send + Sync {
    /// Record that consent was acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be stored.
    async fn record_consent(&self, expires_at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Whether a non-expired consent acknowledgment is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for storage-level failures.
    async fn has_consent(&self, now: DateTime<Utc>) -> Result<bool, StorageError>;
}

#[derive(Debug, Clone)]
struct StoredEntry {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// In-memory store for testing and prototyping.
///
/// Keeps the serialized payload rather than typed values so the textual-blob
/// contract (including malformed-payload recovery) is exercised without a
/// database.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, key: &str, payload: String, expires_at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), StoredEntry { payload, expires_at });
        Ok(())
    }

    fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>, StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.payload.clone())),
            Some(_) => {
                guard.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryStore {
    async fn save_snapshot(
        &self,
        snapshot: &SessionSnapshot,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.put(SESSION_SNAPSHOT_KEY, payload, expires_at)
    }

    async fn load_snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(payload) = self.get(SESSION_SNAPSHOT_KEY, now)? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(_) => {
                self.remove(SESSION_SNAPSHOT_KEY)?;
                Ok(None)
            }
        }
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.remove(SESSION_SNAPSHOT_KEY)
    }
}

#[async_trait]
impl ConsentRepository for InMemoryStore {
    async fn record_consent(&self, expires_at: DateTime<Utc>) -> Result<(), StorageError> {
        self.put(CONSENT_KEY, "true".to_owned(), expires_at)
    }

    async fn has_consent(&self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        Ok(self.get(CONSENT_KEY, now)?.is_some())
    }
}

/// Aggregates the persistence repositories behind trait objects so the
/// backend can be swapped without touching session logic.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub consent: Arc<dyn ConsentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let snapshots: Arc<dyn SnapshotRepository> = Arc::new(store.clone());
        let consent: Arc<dyn ConsentRepository> = Arc::new(store);
        Self { snapshots, consent }
    }
}
