//! Authentication provider trait

use async_trait::async_trait;

use super::error::AuthError;
use super::events::{SessionListener, Subscription};
use super::session::Session;

/// Options passed by the host when querying sessions. Advisory only.
#[derive(Debug, Clone, Default)]
pub struct GetSessionsOptions {
    pub account: Option<String>,
}

/// Capabilities declared when a provider registers with the host
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderOptions {
    pub supports_multiple_accounts: bool,
}

/// Contract between the host and a session-issuing backend
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Cached sessions. `scopes` and `options` do not filter the result.
    async fn get_sessions(
        &self,
        scopes: Option<&[String]>,
        options: &GetSessionsOptions,
    ) -> Vec<Session>;

    /// Mint a new session for `scopes`
    async fn create_session(&self, scopes: &[String]) -> Result<Session, AuthError>;

    /// Drop the session with this id; unknown ids are ignored
    async fn remove_session(&self, session_id: &str);

    /// Listen for cache changes
    fn on_did_change_sessions(&self, listener: SessionListener) -> Subscription;

    /// Release listeners. Idempotent.
    fn dispose(&self);
}
