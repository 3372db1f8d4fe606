//! StackCodeSy authentication CLI

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Diagnostics go to stderr; RUST_LOG=stackcodesy_auth=debug for detail
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting stackcodesy-auth v{}", env!("CARGO_PKG_VERSION"));

    stackcodesy_auth::cli::run()
}
