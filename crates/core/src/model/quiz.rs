use serde::{Deserialize, Serialize};

use crate::model::Question;

/// A full quiz document as returned by `GET {base}/quiz/{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub title: String,
    #[serde(default)]
    pub platform: String,
    pub qa: Vec<Question>,
}

impl QuizDocument {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.qa.len()
    }
}
