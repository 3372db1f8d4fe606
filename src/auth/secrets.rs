//! Durable secret storage capability supplied by the host

use async_trait::async_trait;

/// Key under which the last interactive session is persisted
pub const SESSION_SECRET_KEY: &str = "stackcodesy-session";

/// Opaque key/value secret store. The provider writes and deletes, it never reads.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn store(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove `key`; missing keys are not an error
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
