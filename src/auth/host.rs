//! Host-side registry of authentication providers

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::error::AuthError;
use super::provider::{AuthenticationProvider, GetSessionsOptions, ProviderOptions};
use super::session::Session;

/// Options for [`AuthenticationHost::get_session`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GetSessionOptions {
    /// Ask the provider to create a session when none exists
    pub create_if_none: bool,
}

/// A provider as seen by the host
#[derive(Clone)]
pub struct RegisteredProvider {
    pub id: String,
    pub label: String,
    pub options: ProviderOptions,
    pub provider: Arc<dyn AuthenticationProvider>,
}

type Registry = RwLock<HashMap<String, RegisteredProvider>>;

/// Routes session requests to registered providers by id
#[derive(Default)]
pub struct AuthenticationHost {
    providers: Arc<Registry>,
}

impl AuthenticationHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_provider(
        &self,
        id: &str,
        label: &str,
        provider: Arc<dyn AuthenticationProvider>,
        options: ProviderOptions,
    ) -> Result<ProviderRegistration, AuthError> {
        let mut providers = self.providers.write().await;
        if providers.contains_key(id) {
            return Err(AuthError::ProviderAlreadyRegistered(id.to_string()));
        }

        providers.insert(
            id.to_string(),
            RegisteredProvider {
                id: id.to_string(),
                label: label.to_string(),
                options,
                provider,
            },
        );
        info!("Registered authentication provider {} ({})", id, label);

        Ok(ProviderRegistration {
            id: id.to_string(),
            providers: Arc::downgrade(&self.providers),
        })
    }

    pub async fn provider(&self, id: &str) -> Result<RegisteredProvider, AuthError> {
        self.providers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AuthError::UnknownProvider(id.to_string()))
    }

    pub async fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// First session of the provider, creating one when asked to and none exists
    pub async fn get_session(
        &self,
        provider_id: &str,
        scopes: &[String],
        options: GetSessionOptions,
    ) -> Result<Option<Session>, AuthError> {
        let registered = self.provider(provider_id).await?;
        let sessions = registered
            .provider
            .get_sessions(Some(scopes), &GetSessionsOptions::default())
            .await;

        if let Some(session) = sessions.into_iter().next() {
            return Ok(Some(session));
        }

        if !options.create_if_none {
            debug!("No session for provider {}", provider_id);
            return Ok(None);
        }

        registered.provider.create_session(scopes).await.map(Some)
    }

    pub async fn remove_session(&self, provider_id: &str, session_id: &str) -> Result<(), AuthError> {
        let registered = self.provider(provider_id).await?;
        registered.provider.remove_session(session_id).await;
        Ok(())
    }
}

/// Returned by [`AuthenticationHost::register_provider`]
pub struct ProviderRegistration {
    id: String,
    providers: Weak<Registry>,
}

impl ProviderRegistration {
    pub fn provider_id(&self) -> &str {
        &self.id
    }

    /// Unregister and dispose the provider. Idempotent.
    pub async fn dispose(&self) {
        let Some(providers) = self.providers.upgrade() else {
            return;
        };

        let removed = providers.write().await.remove(&self.id);
        if let Some(registered) = removed {
            registered.provider.dispose();
            info!("Unregistered authentication provider {}", self.id);
        }
    }
}
