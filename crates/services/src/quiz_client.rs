use std::env;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use quiz_core::model::{QuizCode, QuizDocument};

use crate::error::QuizFetchError;

#[derive(Clone, Debug)]
pub struct QuizApiConfig {
    pub base_url: String,
}

impl QuizApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("QUIZ_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }
}

/// Read-only client for the quiz lookup endpoint.
#[derive(Clone)]
pub struct QuizClient {
    client: Client,
    config: QuizApiConfig,
}

impl QuizClient {
    #[must_use]
    pub fn new(config: QuizApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        QuizApiConfig::from_env().map(Self::new)
    }

    /// Fetch the quiz document for a lookup code.
    ///
    /// # Errors
    ///
    /// Returns `QuizFetchError::Api` for non-success responses, carrying the
    /// API's `{error}` body when it parses, and `QuizFetchError::Http` for
    /// connectivity and decoding failures.
    pub async fn fetch_quiz(&self, code: &QuizCode) -> Result<QuizDocument, QuizFetchError> {
        let url = format!(
            "{}/quiz/{code}",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(%code, "fetching quiz");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("API request failed with status: {status}"));
            return Err(QuizFetchError::Api { message });
        }

        Ok(response.json::<QuizDocument>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}
