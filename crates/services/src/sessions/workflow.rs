use std::sync::Arc;

use chrono::Duration;
use tracing::warn;

use quiz_core::Clock;
use quiz_core::model::{Confirmation, QuizCode, QuizDocument, QuizSession};
use storage::repository::{SNAPSHOT_TTL_DAYS, SessionSnapshot, SnapshotRepository};

use crate::error::SessionError;
use crate::quiz_client::QuizClient;

/// Orchestrates the quiz session: every user action records an interaction,
/// applies the core mutation, and snapshots the session best-effort.
///
/// Persistence is never a hard dependency: a failed save is logged and
/// swallowed, and a snapshot that fails to load falls back to a fresh
/// session.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self { clock, snapshots }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Start a session for a loaded quiz, restoring the persisted snapshot
    /// when one is available.
    ///
    /// Restoring counts as a user interaction, so elapsed time resumes
    /// accruing immediately; a fresh session stays untimed until the first
    /// real interaction.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the quiz has no questions.
    pub async fn start_session(&self, quiz: QuizDocument) -> Result<QuizSession, SessionError> {
        let now = self.clock.now();
        let snapshot = match self.snapshots.load_snapshot(now).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "failed to load session snapshot, starting fresh");
                None
            }
        };

        match snapshot {
            Some(snapshot) => {
                let mut session = snapshot.into_session(quiz.qa)?;
                session.touch(now);
                Ok(session)
            }
            None => Ok(QuizSession::new(quiz.qa)?),
        }
    }

    /// Fetch a quiz by code and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` when the quiz cannot be loaded and
    /// `SessionError::Session` when it has no questions.
    pub async fn start_from_api(
        &self,
        client: &QuizClient,
        code: &QuizCode,
    ) -> Result<QuizSession, SessionError> {
        let quiz = client.fetch_quiz(code).await?;
        self.start_session(quiz).await
    }

    /// Apply a letter selection to a question. Returns whether state changed.
    pub async fn select_option(
        &self,
        session: &mut QuizSession,
        question_index: usize,
        letter: char,
    ) -> bool {
        session.touch(self.clock.now());
        let changed = session.select_option(question_index, letter);
        if changed {
            self.persist(session).await;
        }
        changed
    }

    /// Confirm a question's selection, scoring it.
    pub async fn confirm(
        &self,
        session: &mut QuizSession,
        question_index: usize,
    ) -> Option<Confirmation> {
        session.touch(self.clock.now());
        let confirmation = session.confirm(question_index);
        if confirmation.is_some() {
            self.persist(session).await;
        }
        confirmation
    }

    /// Move the cursor to a question. Out-of-range requests are ignored.
    pub async fn navigate_to(&self, session: &mut QuizSession, index: usize) -> bool {
        session.touch(self.clock.now());
        let moved = session.navigate_to(index);
        if moved {
            self.persist(session).await;
        }
        moved
    }

    /// Move to the next question, if any.
    pub async fn next(&self, session: &mut QuizSession) -> bool {
        session.touch(self.clock.now());
        let moved = session.next();
        if moved {
            self.persist(session).await;
        }
        moved
    }

    /// Move to the previous question, if any.
    pub async fn previous(&self, session: &mut QuizSession) -> bool {
        session.touch(self.clock.now());
        let moved = session.previous();
        if moved {
            self.persist(session).await;
        }
        moved
    }

    /// One-second tick: accrues active time while the session is armed and
    /// snapshots the new total.
    pub async fn tick(&self, session: &mut QuizSession) -> bool {
        let accrued = session.tick(self.clock.now());
        if accrued {
            self.persist(session).await;
        }
        accrued
    }

    /// Reset the session to defaults and discard the persisted snapshot.
    pub async fn reset(&self, session: &mut QuizSession) {
        session.reset();
        if let Err(err) = self.snapshots.clear_snapshot().await {
            warn!(error = %err, "failed to clear session snapshot");
        }
    }

    async fn persist(&self, session: &QuizSession) {
        let snapshot = SessionSnapshot::from_session(session);
        let expires_at = self.clock.now() + Duration::days(SNAPSHOT_TTL_DAYS);
        if let Err(err) = self.snapshots.save_snapshot(&snapshot, expires_at).await {
            warn!(error = %err, "failed to persist session snapshot");
        }
    }
}
