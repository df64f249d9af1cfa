// Entry point of the bonus API.
//
// **Architecture Overview:**
// - `core/` = Business logic (bonus mapping, credential chain, client lifecycle)
// - `infra/` = Implementations of core traits (Google auth, Sheets HTTP client)
// - `web/` = HTTP adapters (axum router and handlers)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve HTTP until shutdown

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, EnvSource};
use crate::core::bonuses::{BonusService, CredentialResolver, SheetsConnector};
use crate::infra::sheets::{FileCredentialResolver, InlineKeyResolver, ServiceAccountConnector};
use crate::web::{create_router, shutdown_signal, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:#}", e);
        eprintln!("FATAL ERROR: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // The env file can set RUST_LOG, so it is loaded before logging starts.
    let env_load = config::load_env_file(&config::default_env_paths());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    for (path, error) in &env_load.skipped {
        tracing::warn!(path = %path.display(), %error, "Skipped unreadable env file");
    }
    match &env_load.source {
        EnvSource::File(path) => tracing::info!("Loaded settings from {}", path.display()),
        EnvSource::Environment => {
            tracing::info!("No .env file found, using system environment variables")
        }
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Credential tiers in priority order: key file first, inline pair second.

    let resolvers: Vec<Box<dyn CredentialResolver>> = vec![
        Box::new(FileCredentialResolver::new(config.credentials_path.clone())),
        Box::new(InlineKeyResolver::new(
            config.private_key.clone(),
            config.client_email.clone(),
        )),
    ];
    let connector: Box<dyn SheetsConnector> = Box::new(ServiceAccountConnector::new(resolvers));
    let bonus_service = Arc::new(BonusService::new(connector, config.sheet_id.clone()));

    initialize_on_startup(&*bonus_service, config.fail_fast).await?;

    let app = create_router(AppState::new(Arc::clone(&bonus_service)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Connects eagerly so broken credentials show up in the startup logs.
/// Unless `fail_fast` is set a failure is only logged, and the service
/// retries on the next request.
async fn initialize_on_startup<C: SheetsConnector>(
    service: &BonusService<C>,
    fail_fast: bool,
) -> anyhow::Result<()> {
    if let Err(e) = service.initialize().await {
        if fail_fast {
            return Err(anyhow::Error::new(e).context("Google Sheets initialization failed"));
        }
        tracing::warn!(
            error = %e,
            "Google Sheets initialization failed, will retry on the next request"
        );
    }
    Ok(())
}
