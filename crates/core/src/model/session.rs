use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::activity::ActivityTimer;
use crate::model::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("quiz has no questions")]
    Empty,
}

/// Outcome of confirming a question's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub question_index: usize,
    pub is_correct: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz attempt.
///
/// Owns the loaded question set, the navigation cursor, per-question
/// selections and confirmation flags, the score, and elapsed active time.
/// All answer/scoring/navigation invariants are enforced here; invalid user
/// actions are silent no-ops rather than errors.
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    selections: Vec<Vec<char>>,
    confirmed: Vec<bool>,
    score: u32,
    elapsed_seconds: u64,
    timer: ActivityTimer,
}

impl QuizSession {
    /// Creates a fresh session over the given questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if no questions are provided.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        let len = questions.len();
        Ok(Self {
            questions,
            current_index: 0,
            selections: vec![Vec::new(); len],
            confirmed: vec![false; len],
            score: 0,
            elapsed_seconds: 0,
            timer: ActivityTimer::new(),
        })
    }

    /// Rehydrates a session from a persisted snapshot.
    ///
    /// The snapshot may have been written against a different version of the
    /// quiz: selection and confirmation arrays are resized to the current
    /// question count, and the cursor and score are clamped into range.
    /// Restoration never panics on any persisted shape.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::Empty` if no questions are provided.
    pub fn from_persisted(
        questions: Vec<Question>,
        current_index: usize,
        score: u32,
        mut selections: Vec<Vec<char>>,
        mut confirmed: Vec<bool>,
        elapsed_seconds: u64,
    ) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        let len = questions.len();
        selections.resize(len, Vec::new());
        confirmed.resize(len, false);
        let max_score = u32::try_from(len).unwrap_or(u32::MAX);

        Ok(Self {
            questions,
            current_index: current_index.min(len - 1),
            selections,
            confirmed,
            score: score.min(max_score),
            elapsed_seconds,
            timer: ActivityTimer::new(),
        })
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    /// Applies a letter selection to the given question.
    ///
    /// Single-choice questions replace their selection; multi-choice questions
    /// toggle membership, evicting the oldest selected letter when the
    /// selection would exceed the question's capacity. Returns whether state
    /// changed; selections on confirmed questions, out-of-range indices, and
    /// letters that are not options of the question are ignored.
    pub fn select_option(&mut self, question_index: usize, letter: char) -> bool {
        let Some(question) = self.questions.get(question_index) else {
            return false;
        };
        if self.confirmed[question_index] || !question.has_option(letter) {
            return false;
        }

        if question.is_multi_choice {
            let capacity = question.selection_capacity();
            let slots = &mut self.selections[question_index];
            if let Some(position) = slots.iter().position(|&chosen| chosen == letter) {
                slots.remove(position);
            } else {
                while !slots.is_empty() && slots.len() >= capacity {
                    slots.remove(0);
                }
                slots.push(letter);
            }
        } else {
            self.selections[question_index] = vec![letter];
        }
        true
    }

    /// Whether the confirm action should be enabled for the given question.
    ///
    /// Purely derived: the selection is complete and the question has not
    /// been confirmed yet.
    #[must_use]
    pub fn is_ready_to_confirm(&self, question_index: usize) -> bool {
        let Some(question) = self.questions.get(question_index) else {
            return false;
        };
        !self.confirmed[question_index]
            && self.selections[question_index].len() == question.selection_capacity()
    }

    /// Locks in and scores the current selection for the given question.
    ///
    /// Correctness is exact set equality against the correct answers. The
    /// score increments only when the question is confirmed correct for the
    /// first time; the confirmed flag is then set unconditionally, which is
    /// what makes repeated confirmation a no-op. Returns `None` when the
    /// question is not ready to confirm.
    pub fn confirm(&mut self, question_index: usize) -> Option<Confirmation> {
        if !self.is_ready_to_confirm(question_index) {
            return None;
        }

        let is_correct =
            self.questions[question_index].is_correct_selection(&self.selections[question_index]);

        // Check-then-set: score only while the question still counts as
        // unanswered, then mark it answered.
        if is_correct && !self.confirmed[question_index] {
            self.score += 1;
        }
        self.confirmed[question_index] = true;

        Some(Confirmation {
            question_index,
            is_correct,
        })
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Moves the cursor to `index`. Out-of-range requests are ignored.
    pub fn navigate_to(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Moves to the next question, if any.
    pub fn next(&mut self) -> bool {
        self.current_index
            .checked_add(1)
            .is_some_and(|index| self.navigate_to(index))
    }

    /// Moves to the previous question, if any.
    pub fn previous(&mut self) -> bool {
        self.current_index
            .checked_sub(1)
            .is_some_and(|index| self.navigate_to(index))
    }

    //
    // ─── TIMING ────────────────────────────────────────────────────────────────
    //

    /// Records a user interaction, arming elapsed-time accrual.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.timer.interaction(now);
    }

    /// One-second tick. Accrues a second of active time while the timer is
    /// armed; returns whether anything accrued.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.timer.tick(now) {
            self.elapsed_seconds += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_timing(&self) -> bool {
        self.timer.is_armed()
    }

    //
    // ─── RESET & ACCESS ────────────────────────────────────────────────────────
    //

    /// Restores all fields to defaults sized to the current question set.
    pub fn reset(&mut self) {
        let len = self.questions.len();
        self.current_index = 0;
        self.selections = vec![Vec::new(); len];
        self.confirmed = vec![false; len];
        self.score = 0;
        self.elapsed_seconds = 0;
        self.timer = ActivityTimer::new();
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// Letters currently chosen for a question, oldest first.
    #[must_use]
    pub fn selection(&self, index: usize) -> &[char] {
        self.selections.get(index).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn selections(&self) -> &[Vec<char>] {
        &self.selections
    }

    #[must_use]
    pub fn is_confirmed(&self, index: usize) -> bool {
        self.confirmed.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn confirmed_flags(&self) -> &[bool] {
        &self.confirmed
    }

    /// Number of questions confirmed so far.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.confirmed.iter().filter(|&&flag| flag).count()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("answered", &self.answered_count())
            .field("score", &self.score)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("timing", &self.timer.is_armed())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
