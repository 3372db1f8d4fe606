//! StackCodeSy configuration
//! Resolves provider settings from the environment and an optional YAML file

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const ENV_USER_ID: &str = "STACKCODESY_USER_ID";
pub const ENV_USER_NAME: &str = "STACKCODESY_USER_NAME";
pub const ENV_USER_EMAIL: &str = "STACKCODESY_USER_EMAIL";
pub const ENV_AUTH_TOKEN: &str = "STACKCODESY_AUTH_TOKEN";
pub const ENV_REQUIRE_AUTH: &str = "STACKCODESY_REQUIRE_AUTH";
pub const ENV_AUTH_API: &str = "STACKCODESY_AUTH_API";
pub const ENV_CONFIG_PATH: &str = "STACKCODESY_CONFIG";

/// Everything the provider needs, passed in at construction
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthConfig {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub auth_token: Option<String>,
    /// Interactive login against `auth_api_url` instead of the development session
    pub require_auth: bool,
    pub auth_api_url: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("user_email", &self.user_email)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("require_auth", &self.require_auth)
            .field("auth_api_url", &self.auth_api_url)
            .finish()
    }
}

impl AuthConfig {
    /// Read the `STACKCODESY_*` process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            user_id: get(ENV_USER_ID),
            user_name: get(ENV_USER_NAME),
            user_email: get(ENV_USER_EMAIL),
            auth_token: get(ENV_AUTH_TOKEN),
            require_auth: get(ENV_REQUIRE_AUTH).as_deref() == Some("true"),
            auth_api_url: get(ENV_AUTH_API),
        }
    }
}

/// On-disk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Secret store database path
    #[serde(default = "default_db_path")]
    pub database_path: String,

    /// Defaults for the login flow; the environment wins over these
    #[serde(default)]
    pub auth: AuthSettings,
}

fn default_db_path() -> String {
    "~/.stackcodesy/secrets.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            auth: AuthSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_auth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_api_url: Option<String>,
}

impl Config {
    /// Read the StackCodeSy config, writing a default one on first run
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = Self::config_path(path)?;

        if !config_path.exists() {
            info!("No StackCodeSy config yet, writing defaults to {:?}", config_path);
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {:?}", config_path))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid StackCodeSy config in {:?}", config_path))?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Write the config where [`Config::load`] will find it
    pub fn save(&self, path: Option<&str>) -> Result<()> {
        let config_path = Self::config_path(path)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&self)?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write {:?}", config_path))?;
        debug!("Wrote StackCodeSy config to {:?}", config_path);
        Ok(())
    }

    /// `STACKCODESY_CONFIG`, then `--config`, then `~/.stackcodesy/config.yml`
    fn config_path(path: Option<&str>) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
            return Ok(PathBuf::from(env_path));
        }

        if let Some(p) = path {
            return Ok(PathBuf::from(p));
        }

        let home = dirs::home_dir().context("Cannot find home directory")?;
        Ok(home.join(".stackcodesy").join("config.yml"))
    }

    /// Merge file defaults under the environment
    pub fn resolve_auth<F>(&self, lookup: F) -> AuthConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut auth = AuthConfig::from_lookup(&lookup);

        if lookup(ENV_REQUIRE_AUTH).filter(|v| !v.is_empty()).is_none() {
            auth.require_auth = self.auth.require_auth.unwrap_or(false);
        }
        if auth.auth_api_url.is_none() {
            auth.auth_api_url = self.auth.auth_api_url.clone().filter(|u| !u.is_empty());
        }

        auth
    }

    /// Resolve database path (expand ~)
    pub fn resolve_db_path(&self) -> Result<PathBuf> {
        if !self.database_path.starts_with('~') {
            return Ok(PathBuf::from(&self.database_path));
        }
        let home = dirs::home_dir().context("Cannot find home directory")?;
        let path = self.database_path.replacen('~', &home.to_string_lossy(), 1);
        Ok(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_is_development_mode() {
        let auth = AuthConfig::from_lookup(lookup(&[]));
        assert_eq!(auth, AuthConfig::default());
        assert!(!auth.require_auth);
    }

    #[test]
    fn require_auth_only_for_exact_true() {
        for value in ["TRUE", "1", "yes", "false", ""] {
            let auth = AuthConfig::from_lookup(lookup(&[(ENV_REQUIRE_AUTH, value)]));
            assert!(!auth.require_auth, "{value:?} must not enable production mode");
        }
        let auth = AuthConfig::from_lookup(lookup(&[(ENV_REQUIRE_AUTH, "true")]));
        assert!(auth.require_auth);
    }

    #[test]
    fn from_env_reads_process_environment() {
        assert_eq!(
            AuthConfig::from_env(),
            AuthConfig::from_lookup(|key| std::env::var(key).ok())
        );
    }

    #[test]
    fn empty_values_count_as_unset() {
        let auth = AuthConfig::from_lookup(lookup(&[(ENV_USER_ID, ""), (ENV_AUTH_TOKEN, "t1")]));
        assert_eq!(auth.user_id, None);
        assert_eq!(auth.auth_token.as_deref(), Some("t1"));
    }

    #[test]
    fn environment_overrides_file_settings() {
        let config = Config {
            auth: AuthSettings {
                require_auth: Some(true),
                auth_api_url: Some("https://file.example".into()),
            },
            ..Config::default()
        };

        let from_file = config.resolve_auth(lookup(&[]));
        assert!(from_file.require_auth);
        assert_eq!(from_file.auth_api_url.as_deref(), Some("https://file.example"));

        let from_env = config.resolve_auth(lookup(&[
            (ENV_REQUIRE_AUTH, "false"),
            (ENV_AUTH_API, "https://env.example"),
        ]));
        assert!(!from_env.require_auth);
        assert_eq!(from_env.auth_api_url.as_deref(), Some("https://env.example"));
    }

    #[test]
    fn debug_hides_token() {
        let auth = AuthConfig::from_lookup(lookup(&[(ENV_AUTH_TOKEN, "very-secret")]));
        assert!(!format!("{:?}", auth).contains("very-secret"));
    }

    #[test]
    fn load_creates_default_file_then_reads_it_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let path = path.to_str().unwrap();

        let created = Config::load(Some(path)).unwrap();
        assert!(std::path::Path::new(path).exists());

        let mut edited = created.clone();
        edited.auth.auth_api_url = Some("https://auth.example".into());
        edited.save(Some(path)).unwrap();

        let reloaded = Config::load(Some(path)).unwrap();
        assert_eq!(reloaded.database_path, created.database_path);
        assert_eq!(reloaded.auth.auth_api_url.as_deref(), Some("https://auth.example"));
    }

    #[test]
    fn parses_partial_yaml() {
        let config: Config = serde_yaml::from_str("auth:\n  require_auth: true\n").unwrap();
        assert_eq!(config.database_path, "~/.stackcodesy/secrets.db");
        assert_eq!(config.auth.require_auth, Some(true));
        assert_eq!(config.auth.auth_api_url, None);
    }
}
