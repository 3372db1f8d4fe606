//! `stackcodesy.auth.*` command handlers

use tracing::{error, info};

use super::error::AuthError;
use super::host::{AuthenticationHost, GetSessionOptions};
use super::notify::Notifier;
use super::session::{default_scopes, Session, AUTH_TYPE};

pub const LOGIN_COMMAND: &str = "stackcodesy.auth.login";
pub const LOGOUT_COMMAND: &str = "stackcodesy.auth.logout";

/// Sign in, creating a session if none exists
pub async fn login(
    host: &AuthenticationHost,
    notifier: &dyn Notifier,
) -> Result<Option<Session>, AuthError> {
    let options = GetSessionOptions { create_if_none: true };
    match host.get_session(AUTH_TYPE, &default_scopes(), options).await {
        Ok(Some(session)) => {
            notifier.info(&format!("Signed in as {}", session.account.label));
            Ok(Some(session))
        }
        Ok(None) => Ok(None),
        Err(e) => {
            error!("Login command error: {}", e);
            Err(e)
        }
    }
}

/// Sign out of the active session, if there is one.
///
/// Returns the id of the removed session.
pub async fn logout(
    host: &AuthenticationHost,
    notifier: &dyn Notifier,
) -> Result<Option<String>, AuthError> {
    let options = GetSessionOptions { create_if_none: false };
    let Some(session) = host.get_session(AUTH_TYPE, &default_scopes(), options).await? else {
        notifier.warn("No active StackCodeSy session");
        return Ok(None);
    };

    notifier.info("Signing out...");
    host.remove_session(AUTH_TYPE, &session.id).await?;
    info!("Signed out session {}", session.id);

    Ok(Some(session.id))
}
