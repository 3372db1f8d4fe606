//! CLI commands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::auth::commands::LOGIN_COMMAND;
use crate::auth::{
    AuthenticationProvider, GetSessionsOptions, Notifier, SessionChangeEvent, SESSION_SECRET_KEY,
};
use crate::config::Config;
use crate::core::AppState;
use crate::db::{Database, SecretRepository};

use super::terminal::{ConsoleNotifier, TerminalPrompt};

#[derive(Parser)]
#[command(name = "stackcodesy-auth")]
#[command(about = "Sign in to StackCodeSy and manage the active session", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: ~/.stackcodesy/config.yml)
    #[arg(long)]
    config: Option<String>,

    /// Secret store path (default: from config)
    #[arg(long)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, creating a session if none exists
    Login,

    /// Sign out of the active session
    Logout,

    /// Show cached sessions
    Status,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let db_path = match cli.database {
        Some(path) => PathBuf::from(path),
        None => config.resolve_db_path()?,
    };

    let db = Database::new(&db_path)?;
    let secrets = Arc::new(SecretRepository::new(db));
    let auth = config.resolve_auth(|key| std::env::var(key).ok());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let app = AppState::activate(
            auth,
            Arc::new(TerminalPrompt),
            secrets.clone(),
            Arc::new(ConsoleNotifier),
        )
        .await?;

        let subscription = app.provider.on_did_change_sessions(Box::new(|event: &SessionChangeEvent| {
            tracing::debug!(
                added = event.added.len(),
                removed = event.removed.len(),
                "Sessions changed"
            );
        }));
        app.provider.load_existing_session().await;

        let outcome = match cli.command {
            Commands::Login => app.execute_command(LOGIN_COMMAND).await.map_err(anyhow::Error::from),
            Commands::Logout => logout(&app, &secrets, &ConsoleNotifier).await,
            Commands::Status => status(&app, &secrets).await,
        };

        subscription.dispose();
        app.deactivate().await;

        outcome
    })
}

/// Sign out, then clear a session persisted by an earlier process.
///
/// Each CLI run starts with an empty cache, so a stored session from a
/// previous `login` has no live counterpart to remove.
pub async fn logout(app: &AppState, secrets: &SecretRepository, notifier: &dyn Notifier) -> Result<()> {
    if app.logout().await?.is_some() {
        return Ok(());
    }

    if secrets.remove(SESSION_SECRET_KEY).await? {
        notifier.info("Cleared stored StackCodeSy session");
    }
    Ok(())
}

async fn status(app: &AppState, secrets: &SecretRepository) -> Result<()> {
    let sessions = app
        .provider
        .get_sessions(None, &GetSessionsOptions::default())
        .await;

    if sessions.is_empty() {
        println!("No active sessions");
    } else {
        for session in sessions {
            println!(
                "[{}] {} - {}",
                session.id,
                session.account.label,
                session.scopes.join(", ")
            );
        }
    }

    match secrets.get(SESSION_SECRET_KEY).await? {
        Some(record) => println!("Stored session updated at {}", record.updated_at),
        None => println!("No stored session"),
    }
    Ok(())
}
