//! StackCodeSy session provider implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::AuthConfig;

use super::client::LoginClient;
use super::error::AuthError;
use super::events::{SessionChangeEmitter, SessionChangeEvent, SessionListener, Subscription};
use super::notify::Notifier;
use super::prompt::{CredentialPrompt, PromptOptions};
use super::provider::{AuthenticationProvider, GetSessionsOptions};
use super::secrets::{SecretStore, SESSION_SECRET_KEY};
use super::session::{default_scopes, resolve_label, Session};

/// Issues StackCodeSy sessions from the environment, a development stub, or
/// an interactive login against the remote API.
pub struct StackCodeSyProvider {
    config: AuthConfig,
    login_client: Option<LoginClient>,
    prompt: Arc<dyn CredentialPrompt>,
    secrets: Arc<dyn SecretStore>,
    notifier: Arc<dyn Notifier>,
    sessions: RwLock<Vec<Session>>,
    emitter: SessionChangeEmitter,
}

impl StackCodeSyProvider {
    /// Build a provider with an empty cache. Call
    /// [`load_existing_session`](Self::load_existing_session) to bootstrap.
    pub fn new(
        config: AuthConfig,
        prompt: Arc<dyn CredentialPrompt>,
        secrets: Arc<dyn SecretStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let login_client = config
            .auth_api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| LoginClient::new(url));

        Self {
            config,
            login_client,
            prompt,
            secrets,
            notifier,
            sessions: RwLock::new(Vec::new()),
            emitter: SessionChangeEmitter::new(),
        }
    }

    /// Build a provider and schedule the environment bootstrap without
    /// waiting for it. Must be called inside a tokio runtime.
    pub fn spawn(
        config: AuthConfig,
        prompt: Arc<dyn CredentialPrompt>,
        secrets: Arc<dyn SecretStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        let provider = Arc::new(Self::new(config, prompt, secrets, notifier));
        let bootstrap = Arc::clone(&provider);
        tokio::spawn(async move {
            bootstrap.load_existing_session().await;
        });
        provider
    }

    /// Override the login request timeout
    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_client = self
            .login_client
            .map(|client| LoginClient::with_timeout(client.base_url().to_string(), timeout));
        self
    }

    /// Synthesize a session from pre-provisioned credentials, if any.
    ///
    /// Needs both a user id and a token; never prompts and never touches the network.
    pub async fn load_existing_session(&self) {
        let (user_id, auth_token) = match (
            non_empty(&self.config.user_id),
            non_empty(&self.config.auth_token),
        ) {
            (Some(id), Some(token)) => (id, token),
            _ => {
                info!("No pre-authenticated session found");
                return;
            }
        };

        info!("Loading pre-authenticated session for user: {}", user_id);

        let label = resolve_label(&[
            non_empty(&self.config.user_name),
            non_empty(&self.config.user_email),
            Some(user_id),
        ]);
        let session = Session::for_user(user_id, auth_token, label, default_scopes());
        self.insert_session(session).await;

        info!("Session loaded successfully");
    }

    /// Add a session, replacing any cached entry with the same id
    async fn insert_session(&self, session: Session) {
        let event = {
            let mut sessions = self.sessions.write().await;
            let replaced = sessions
                .iter()
                .position(|s| s.id == session.id)
                .map(|index| sessions.remove(index));
            sessions.push(session.clone());

            SessionChangeEvent {
                added: vec![session],
                removed: replaced.into_iter().collect(),
                changed: Vec::new(),
            }
        };

        self.emitter.fire(&event);
    }

    async fn login_interactively(&self, scopes: &[String]) -> Result<Session, AuthError> {
        let client = self.login_client.as_ref().ok_or(AuthError::Configuration)?;

        let username = self
            .prompt
            .prompt_text(
                PromptOptions::new("Enter your StackCodeSy username or email")
                    .with_placeholder("username@example.com"),
            )
            .await
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InputRequired("Username".to_string()))?;

        let password = self
            .prompt
            .prompt_secret(
                PromptOptions::new("Enter your StackCodeSy password").with_placeholder("Password"),
            )
            .await
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::InputRequired("Password".to_string()))?;

        let outcome = client.login(&username, &password).await?;

        let label = resolve_label(&[
            outcome.user.name.as_deref(),
            outcome.user.email.as_deref(),
        ]);
        let session = Session::for_user(
            &outcome.user.id,
            outcome.token,
            label.clone(),
            scopes.to_vec(),
        );

        // Persist first so a storage failure leaves the cache untouched.
        let serialized =
            serde_json::to_string(&session).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.secrets
            .store(SESSION_SECRET_KEY, &serialized)
            .await
            .map_err(|e| AuthError::Storage(format!("{:#}", e)))?;

        self.insert_session(session.clone()).await;
        self.notifier.info(&format!("Welcome, {}!", label));

        Ok(session)
    }
}

#[async_trait]
impl AuthenticationProvider for StackCodeSyProvider {
    async fn get_sessions(
        &self,
        scopes: Option<&[String]>,
        _options: &GetSessionsOptions,
    ) -> Vec<Session> {
        debug!(
            "getSessions called with scopes: {}",
            scopes.map(|s| s.join(", ")).unwrap_or_default()
        );
        self.sessions.read().await.clone()
    }

    async fn create_session(&self, scopes: &[String]) -> Result<Session, AuthError> {
        debug!("createSession called with scopes: {}", scopes.join(", "));

        if !self.config.require_auth {
            let session = Session::development(scopes.to_vec());
            self.insert_session(session.clone()).await;
            info!("Created development session");
            return Ok(session);
        }

        match self.login_interactively(scopes).await {
            Ok(session) => Ok(session),
            Err(e) => {
                error!("Authentication error: {}", e);
                self.notifier
                    .error(&format!("StackCodeSy login failed: {}", e.user_message()));
                Err(e)
            }
        }
    }

    async fn remove_session(&self, session_id: &str) {
        debug!("removeSession called for: {}", session_id);

        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions
                .iter()
                .position(|s| s.id == session_id)
                .map(|index| sessions.remove(index))
        };

        let Some(session) = removed else {
            return;
        };

        self.emitter.fire(&SessionChangeEvent::removed(session));

        if let Err(e) = self.secrets.delete(SESSION_SECRET_KEY).await {
            warn!("Failed to clear stored session: {:#}", e);
        }

        self.notifier.info("Signed out of StackCodeSy");
    }

    fn on_did_change_sessions(&self, listener: SessionListener) -> Subscription {
        self.emitter.subscribe(listener)
    }

    fn dispose(&self) {
        self.emitter.dispose();
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
