use std::sync::Arc;

use chrono::Duration;

use quiz_core::Clock;
use storage::repository::{CONSENT_TTL_DAYS, ConsentRepository, StorageError};

/// Facade over the consent acknowledgment flag.
///
/// Separate from the quiz session: the flag has its own key and a 365-day
/// retention window, and survives session resets.
#[derive(Clone)]
pub struct ConsentService {
    clock: Clock,
    consent: Arc<dyn ConsentRepository>,
}

impl ConsentService {
    #[must_use]
    pub fn new(clock: Clock, consent: Arc<dyn ConsentRepository>) -> Self {
        Self { clock, consent }
    }

    /// Whether consent has been acknowledged and has not expired.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    pub async fn is_accepted(&self) -> Result<bool, StorageError> {
        self.consent.has_consent(self.clock.now()).await
    }

    /// Record the acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be stored.
    pub async fn accept(&self) -> Result<(), StorageError> {
        let expires_at = self.clock.now() + Duration::days(CONSENT_TTL_DAYS);
        self.consent.record_consent(expires_at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn accept_then_query() {
        let service = ConsentService::new(fixed_clock(), Arc::new(InMemoryStore::new()));
        assert!(!service.is_accepted().await.unwrap());

        service.accept().await.unwrap();
        assert!(service.is_accepted().await.unwrap());
    }
}
