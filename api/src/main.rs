use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use agri_api::{create_app, AppState};
use agri_core::services::{DenylistCleanup, DenylistCleanupConfig};
use agri_infra::{initialize_schema, DatabasePool};
use agri_shared::config::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting farm management API"
    );

    config
        .validate()
        .context("Refusing to start with an unsafe configuration")?;

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to open the database")?;
    initialize_schema(pool.get_pool())
        .await
        .context("Failed to bootstrap the database schema")?;
    tracing::info!("{}", pool.get_statistics());

    let state = web::Data::new(AppState::new(config.clone(), pool.clone()));

    if let Some(denylist) = state.tokens.denylist() {
        let cleanup = DenylistCleanup::new(
            denylist,
            state.tokens.clock(),
            DenylistCleanupConfig::default(),
        );
        Arc::new(cleanup).start_background_task();
    }

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    pool.close().await;
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(logging.source_location)
                    .with_line_number(logging.source_location),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(logging.source_location)
                    .with_line_number(logging.source_location),
            )
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_file(logging.source_location)
                    .with_line_number(logging.source_location),
            )
            .init(),
    }
}
