use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{
    CONSENT_KEY, ConsentRepository, SESSION_SNAPSHOT_KEY, SessionSnapshot, SnapshotRepository,
    StorageError,
};

use super::SqliteStore;

impl SqliteStore {
    async fn put(
        &self,
        key: &str,
        payload: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO persisted_state (key, payload, expires_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                expires_at = excluded.expires_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    /// Fetch a live payload; expired rows are deleted and read as absent.
    async fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT payload, expires_at FROM persisted_state WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        if expires_at <= now {
            self.remove(key).await?;
            return Ok(None);
        }

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(payload))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM persisted_state WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for SqliteStore {
    async fn save_snapshot(
        &self,
        snapshot: &SessionSnapshot,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.put(SESSION_SNAPSHOT_KEY, &payload, expires_at).await
    }

    async fn load_snapshot(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(payload) = self.get(SESSION_SNAPSHOT_KEY, now).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(_) => {
                // A blob we can no longer parse is as good as no blob.
                self.remove(SESSION_SNAPSHOT_KEY).await?;
                Ok(None)
            }
        }
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.remove(SESSION_SNAPSHOT_KEY).await
    }
}

#[async_trait]
impl ConsentRepository for SqliteStore {
    async fn record_consent(&self, expires_at: DateTime<Utc>) -> Result<(), StorageError> {
        self.put(CONSENT_KEY, "true", expires_at).await
    }

    async fn has_consent(&self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        Ok(self.get(CONSENT_KEY, now).await?.is_some())
    }
}
