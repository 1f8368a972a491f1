//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizSessionError;
use storage::repository::StorageError;

/// Errors emitted by `QuizClient`.
///
/// Callers display either variant through [`QuizFetchError::user_message`];
/// the split exists only so logs can tell an API-reported failure from a
/// connectivity one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFetchError {
    /// The API answered with a non-success status and (where possible) its
    /// own error message.
    #[error("{message}")]
    Api { message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl QuizFetchError {
    /// One displayable string for every failure mode, so the caller never
    /// needs to distinguish transport failures from API-reported errors.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message } => message.clone(),
            Self::Http(_) => "Could not connect to the quiz API. Is it running?".to_owned(),
        }
    }
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Fetch(#[from] QuizFetchError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
