mod code;
mod question;
mod quiz;
mod session;

pub use code::{ParseCodeError, QuizCode};
pub use question::{AnswerOption, Question};
pub use quiz::QuizDocument;
pub use session::{Confirmation, QuizSession, QuizSessionError};
