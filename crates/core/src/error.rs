use thiserror::Error;

use crate::model::{ParseCodeError, QuizSessionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] QuizSessionError),
    #[error(transparent)]
    Code(#[from] ParseCodeError),
}
