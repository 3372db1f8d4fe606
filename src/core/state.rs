//! Application state

use std::sync::Arc;

use crate::auth::{
    commands, AuthError, AuthenticationHost, AuthenticationProvider, CredentialPrompt, Notifier,
    ProviderOptions, ProviderRegistration, SecretStore, Session, StackCodeSyProvider, AUTH_NAME,
    AUTH_TYPE,
};
use crate::config::AuthConfig;

/// The activated extension: host, registered provider and command entry points
pub struct AppState {
    pub host: AuthenticationHost,
    pub provider: Arc<StackCodeSyProvider>,
    pub registration: ProviderRegistration,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Build the provider and register it under the `stackcodesy` identity.
    ///
    /// The environment bootstrap is not run here; call
    /// [`StackCodeSyProvider::load_existing_session`] once listeners are attached.
    pub async fn activate(
        config: AuthConfig,
        prompt: Arc<dyn CredentialPrompt>,
        secrets: Arc<dyn SecretStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AuthError> {
        tracing::info!("Extension activating...");

        let provider = Arc::new(StackCodeSyProvider::new(
            config,
            prompt,
            secrets,
            Arc::clone(&notifier),
        ));

        let host = AuthenticationHost::new();
        let registration = host
            .register_provider(
                AUTH_TYPE,
                AUTH_NAME,
                Arc::clone(&provider) as Arc<dyn AuthenticationProvider>,
                ProviderOptions {
                    supports_multiple_accounts: false,
                },
            )
            .await?;

        tracing::info!("Extension activated successfully");

        Ok(Self {
            host,
            provider,
            registration,
            notifier,
        })
    }

    pub async fn login(&self) -> Result<Option<Session>, AuthError> {
        commands::login(&self.host, self.notifier.as_ref()).await
    }

    pub async fn logout(&self) -> Result<Option<String>, AuthError> {
        commands::logout(&self.host, self.notifier.as_ref()).await
    }

    /// Run a registered command by id
    pub async fn execute_command(&self, command: &str) -> Result<(), AuthError> {
        match command {
            commands::LOGIN_COMMAND => self.login().await.map(|_| ()),
            commands::LOGOUT_COMMAND => self.logout().await.map(|_| ()),
            other => Err(AuthError::UnknownCommand(other.to_string())),
        }
    }

    pub async fn deactivate(&self) {
        tracing::info!("Extension deactivating...");
        self.registration.dispose().await;
    }
}
