// Main entry point for the rate ingestion and credential vault API

use anyhow::{Context, Result};
use server_core::{kernel::ServerDeps, server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hotel operations API");

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database ready, migrations applied");

    let deps = ServerDeps::from_config(&config, pool).context("Failed to build dependencies")?;
    tracing::info!(
        rate_extraction = deps.rate_extractor.is_some(),
        credential_vault = deps.pms_encryption_key.is_some(),
        "Dependencies wired"
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind to port {}", config.port))?;
    tracing::info!(port = config.port, "Listening");

    axum::serve(listener, build_app(deps))
        .await
        .context("Server error")?;

    Ok(())
}
