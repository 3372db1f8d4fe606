//! StackCodeSy authentication provider

pub mod client;
pub mod commands;
pub mod error;
pub mod events;
pub mod host;
pub mod notify;
pub mod prompt;
pub mod provider;
pub mod secrets;
pub mod session;
pub mod stackcodesy_provider;

pub use client::{AuthResponse, AuthUser, LoginClient, LoginSuccess, LoginUser, LOGIN_TIMEOUT};
pub use error::AuthError;
pub use events::{SessionChangeEmitter, SessionChangeEvent, SessionListener, Subscription};
pub use host::{AuthenticationHost, GetSessionOptions, ProviderRegistration, RegisteredProvider};
pub use notify::Notifier;
pub use prompt::{CredentialPrompt, PromptOptions};
pub use provider::{AuthenticationProvider, GetSessionsOptions, ProviderOptions};
pub use secrets::{SecretStore, SESSION_SECRET_KEY};
pub use session::{Account, Session, AUTH_NAME, AUTH_TYPE};
pub use stackcodesy_provider::StackCodeSyProvider;
