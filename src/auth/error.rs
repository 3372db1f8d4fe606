//! Authentication errors

/// Generic message used when nothing more specific is known
pub const GENERIC_FAILURE: &str = "Authentication failed";

/// Errors raised by the provider and the host registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Production mode is active but no login endpoint is configured
    #[error("STACKCODESY_AUTH_API environment variable not set")]
    Configuration,

    /// The user cancelled a credential prompt or submitted nothing
    #[error("{0} is required")]
    InputRequired(String),

    /// The login endpoint could not be reached or its reply could not be read
    #[error("{0}")]
    Transport(String),

    /// The login endpoint answered but refused, or sent an incomplete success payload
    #[error("{0}")]
    AuthenticationRejected(String),

    /// The secret store failed to persist the session
    #[error("Failed to persist session: {0}")]
    Storage(String),

    #[error("Unknown authentication provider: {0}")]
    UnknownProvider(String),

    #[error("Authentication provider already registered: {0}")]
    ProviderAlreadyRegistered(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl AuthError {
    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_required_names_the_field() {
        assert_eq!(
            AuthError::InputRequired("Username".into()).user_message(),
            "Username is required"
        );
    }

    #[test]
    fn empty_messages_fall_back_to_generic() {
        assert_eq!(AuthError::Transport(String::new()).user_message(), GENERIC_FAILURE);
        assert_eq!(
            AuthError::AuthenticationRejected("bad password".into()).user_message(),
            "bad password"
        );
    }
}
