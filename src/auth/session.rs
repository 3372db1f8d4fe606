//! Session and account types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider identity registered with the host
pub const AUTH_TYPE: &str = "stackcodesy";

/// Display name registered with the host
pub const AUTH_NAME: &str = "StackCodeSy";

/// Prefix for every session id minted by this provider
pub const SESSION_ID_PREFIX: &str = "stackcodesy-";

/// Scopes granted to a pre-authenticated session and requested by the login command
pub const DEFAULT_SCOPES: [&str; 2] = ["user:read", "workspace:write"];

pub const DEV_SESSION_ID: &str = "stackcodesy-dev";
pub const DEV_ACCESS_TOKEN: &str = "dev-token";
pub const DEV_ACCOUNT_ID: &str = "dev-user";
pub const DEV_ACCOUNT_LABEL: &str = "Development User";

/// Display identity of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub label: String,
}

/// One authenticated identity bound to the provider.
///
/// Sessions are never mutated once cached; replacing one means removing it
/// and adding the new value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub access_token: String,
    pub account: Account,
    pub scopes: Vec<String>,
}

impl Session {
    /// Session for a known user id, as produced by the bootstrap and login paths
    pub fn for_user(
        user_id: &str,
        access_token: impl Into<String>,
        label: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            id: format!("{}{}", SESSION_ID_PREFIX, user_id),
            access_token: access_token.into(),
            account: Account {
                id: user_id.to_string(),
                label: label.into(),
            },
            scopes,
        }
    }

    /// Zero-friction session used when authentication is not required
    pub fn development(scopes: Vec<String>) -> Self {
        Self {
            id: DEV_SESSION_ID.to_string(),
            access_token: DEV_ACCESS_TOKEN.to_string(),
            account: Account {
                id: DEV_ACCOUNT_ID.to_string(),
                label: DEV_ACCOUNT_LABEL.to_string(),
            },
            scopes,
        }
    }
}

// Tokens must never reach the logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("access_token", &"<redacted>")
            .field("account", &self.account)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// First non-empty candidate, or an empty string when none qualifies
pub fn resolve_label(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .find(|c| !c.is_empty())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}
