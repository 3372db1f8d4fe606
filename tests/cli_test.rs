// Tests for the CLI host's logout handling of persisted sessions

mod common;

use std::sync::Arc;

use stackcodesy_auth::auth::{AuthenticationProvider, GetSessionsOptions, SESSION_SECRET_KEY};
use stackcodesy_auth::cli::commands::logout;
use stackcodesy_auth::config::AuthConfig;
use stackcodesy_auth::core::AppState;
use stackcodesy_auth::db::{Database, SecretRepository};
use tempfile::TempDir;

use common::{Notice, RecordingNotifier, ScriptedPrompt};

async fn setup() -> (AppState, Arc<SecretRepository>, Arc<RecordingNotifier>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(temp_dir.path().join("secrets.db")).unwrap();
    let secrets = Arc::new(SecretRepository::new(db));
    let notifier = RecordingNotifier::new();
    let app = AppState::activate(
        AuthConfig::default(),
        ScriptedPrompt::answering(&[]),
        secrets.clone(),
        notifier.clone(),
    )
    .await
    .unwrap();
    (app, secrets, notifier, temp_dir)
}

#[tokio::test]
async fn test_logout_clears_session_stored_by_earlier_run() {
    let (app, secrets, notifier, _temp) = setup().await;
    secrets
        .put(SESSION_SECRET_KEY, r#"{"id":"stackcodesy-42"}"#)
        .await
        .unwrap();

    logout(&app, &secrets, notifier.as_ref()).await.unwrap();

    assert!(secrets.get(SESSION_SECRET_KEY).await.unwrap().is_none());
    assert_eq!(
        notifier.all(),
        vec![
            Notice::Warn("No active StackCodeSy session".into()),
            Notice::Info("Cleared stored StackCodeSy session".into()),
        ]
    );
}

#[tokio::test]
async fn test_logout_with_nothing_stored_only_warns() {
    let (app, secrets, notifier, _temp) = setup().await;

    logout(&app, &secrets, notifier.as_ref()).await.unwrap();

    assert_eq!(
        notifier.all(),
        vec![Notice::Warn("No active StackCodeSy session".into())]
    );
}

#[tokio::test]
async fn test_logout_of_live_session_removes_stored_copy() {
    let (app, secrets, notifier, _temp) = setup().await;
    app.login().await.unwrap();
    secrets.put(SESSION_SECRET_KEY, "stale").await.unwrap();

    logout(&app, &secrets, notifier.as_ref()).await.unwrap();

    assert!(secrets.get(SESSION_SECRET_KEY).await.unwrap().is_none());
    assert!(app.provider.get_sessions(None, &GetSessionsOptions::default()).await.is_empty());
    assert!(!notifier
        .all()
        .contains(&Notice::Info("Cleared stored StackCodeSy session".into())));
}
