// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strety Bridge Server
//!
//! Exposes Strety todos, goals and people as tool calls over a local
//! request/response channel.

use strety_bridge::{
    config::Config,
    services::{CredentialStore, StretyService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging on stderr
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(api_base = %config.api_base, "Starting Strety bridge");

    // Token file wins over env seed values; no token at all is fatal.
    let token_path = config.token_path();
    let credentials = match CredentialStore::load(
        &token_path,
        config.access_token.clone(),
        config.refresh_token.clone(),
    ) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %token_path.display(), error = %e, "No Strety credentials");
            return Err(e.into());
        }
    };

    if config.client_id.is_none() || config.client_secret.is_none() {
        tracing::warn!("STRETY_CLIENT_ID/STRETY_CLIENT_SECRET not set, token refresh disabled");
    }

    let strety = StretyService::new(&config, credentials)?;

    // Build shared state
    let state = Arc::new(AppState { strety });

    // Build router
    let app = strety_bridge::routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Strety bridge listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strety_bridge=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
