//! Secret repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::auth::SecretStore;
use crate::db::Database;

#[derive(Debug, Clone)]
pub struct SecretRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// SQLite-backed [`SecretStore`]
pub struct SecretRepository {
    db: Database,
}

impl SecretRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert or overwrite a secret
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.lock().await;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO secrets (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )
        .context("Failed to store secret")?;

        tracing::debug!("Stored secret: {}", key);
        Ok(())
    }

    /// Get a secret by key
    pub async fn get(&self, key: &str) -> Result<Option<SecretRecord>> {
        let conn = self.db.lock().await;
        let record = conn
            .query_row(
                "SELECT key, value, updated_at FROM secrets WHERE key = ?1",
                params![key],
                |row| {
                    let updated_at = DateTime::parse_from_rfc3339(&row.get::<_, String>(2)?)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(SecretRecord {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        updated_at,
                    })
                },
            )
            .optional()
            .context("Failed to get secret")?;

        Ok(record)
    }

    /// Delete a secret. Returns whether a row was removed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.db.lock().await;
        let deleted = conn
            .execute("DELETE FROM secrets WHERE key = ?1", params![key])
            .context("Failed to delete secret")?;
        tracing::debug!("Deleted secret: {} ({} rows)", key, deleted);
        Ok(deleted > 0)
    }
}

#[async_trait]
impl SecretStore for SecretRepository {
    async fn store(&self, key: &str, value: &str) -> Result<()> {
        self.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.remove(key).await.map(|_| ())
    }
}
