#![forbid(unsafe_code)]

pub mod consent_service;
pub mod error;
pub mod quiz_client;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use consent_service::ConsentService;
pub use error::{QuizFetchError, SessionError};
pub use quiz_client::{QuizApiConfig, QuizClient};

pub use sessions::{SessionLoopService, SessionProgress, SessionView};
