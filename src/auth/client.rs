//! StackCodeSy login API client

use std::fmt;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info, warn};

use super::error::{AuthError, GENERIC_FAILURE};

/// Hard limit on a single login attempt
pub const LOGIN_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body returned by `POST /login`
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: Option<bool>,
    pub token: Option<String>,
    pub user: Option<AuthUser>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A validated user: the id is always present and non-empty
#[derive(Debug, Clone)]
pub struct LoginUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A validated successful login
#[derive(Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub user: LoginUser,
}

impl fmt::Debug for LoginSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSuccess")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Only the `error` field matters when the endpoint answers with a failure status
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the remote login endpoint
pub struct LoginClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl LoginClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, LOGIN_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build login HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Exchange credentials for a token.
    ///
    /// A reply only counts as success when `success` is true and both
    /// `token` and a `user` with an id are present. `null` is treated as absent.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let url = format!("{}/login", self.base_url.trim_end_matches('/'));
        let request = LoginRequest { username, password };

        debug!("Sending login request: {:?}", request);

        let response = match self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Login HTTP error: {}", e);
                return Err(transport_error(&e, self.timeout));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let server_error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|e| !e.is_empty());

            return Err(match server_error {
                Some(message) => AuthError::AuthenticationRejected(message),
                None => AuthError::Transport(format!(
                    "Request failed with status code {}",
                    status.as_u16()
                )),
            });
        }

        let body: AuthResponse = response.json().await.map_err(|e| {
            error!("Failed to parse login response: {}", e);
            AuthError::Transport(format!("Invalid response from login endpoint: {}", e))
        })?;

        let outcome = validate(body)?;
        info!("Login accepted for user {}", outcome.user.id);
        Ok(outcome)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn validate(body: AuthResponse) -> Result<LoginSuccess, AuthError> {
    let token = body.token.filter(|t| !t.is_empty());
    let user = body
        .user
        .and_then(|u| Some((u.id.filter(|id| !id.is_empty())?, u.name, u.email)));

    match (body.success.unwrap_or(false), token, user) {
        (true, Some(token), Some((id, name, email))) => Ok(LoginSuccess {
            token,
            user: LoginUser { id, name, email },
        }),
        _ => Err(AuthError::AuthenticationRejected(
            body.error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        )),
    }
}

fn transport_error(err: &reqwest::Error, timeout: Duration) -> AuthError {
    if err.is_timeout() {
        AuthError::Transport(format!("timeout of {}ms exceeded", timeout.as_millis()))
    } else {
        AuthError::Transport(err.to_string())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => Some(s),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    })
}
