use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// One selectable answer, identified by a letter unique within its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub letter: char,
    pub text: String,
}

/// A single quiz question as served by the API.
///
/// `is_multi_choice` is provided by the server and is authoritative: it is
/// never derived from the number of correct answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub scenario: String,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
    pub correct_answers: Vec<char>,
    #[serde(default)]
    pub is_multi_choice: bool,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub wrong_explanation: String,
    /// Difficulty tag (1-3), display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl Question {
    /// Number of letters a complete selection must contain.
    ///
    /// For multi-choice questions this is also the ring capacity for
    /// oldest-first eviction.
    #[must_use]
    pub fn selection_capacity(&self) -> usize {
        self.correct_answers.len()
    }

    /// Whether `letter` names one of this question's options.
    #[must_use]
    pub fn has_option(&self, letter: char) -> bool {
        self.options.iter().any(|option| option.letter == letter)
    }

    /// Whether `letter` is one of the correct answers.
    #[must_use]
    pub fn is_correct_letter(&self, letter: char) -> bool {
        self.correct_answers.contains(&letter)
    }

    /// Judges a selection against the correct answers.
    ///
    /// Order-independent exact set equality: `[b, a]` matches `[a, b]`, but a
    /// strict subset or superset of the correct letters does not.
    #[must_use]
    pub fn is_correct_selection(&self, selection: &[char]) -> bool {
        let chosen: BTreeSet<char> = selection.iter().copied().collect();
        let correct: BTreeSet<char> = self.correct_answers.iter().copied().collect();
        chosen == correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
