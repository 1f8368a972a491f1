use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque lookup code identifying one quiz document (e.g. `GCP-ML`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizCode(String);

impl QuizCode {
    /// Creates a `QuizCode` from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `ParseCodeError` if the input is empty or whitespace-only.
    pub fn new(code: impl Into<String>) -> Result<Self, ParseCodeError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(ParseCodeError);
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for QuizCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizCode({})", self.0)
    }
}

impl fmt::Display for QuizCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a quiz code from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCodeError;

impl fmt::Display for ParseCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quiz code cannot be empty")
    }
}

impl std::error::Error for ParseCodeError {}

impl FromStr for QuizCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
