//! # Chat Server
//!
//! Serves `SignIn` and `GetChatHistory` over HTTP.
//!
//! Configuration comes from the environment (`SVC_SECRET_KEY` is required,
//! `SVC_HTTP_HOST`, `SVC_HTTP_PORT`, `SVC_MAX_REQUEST_SIZE` and
//! `SVC_CORS_ORIGINS` are optional). Logging honours `RUST_LOG`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_service::build_registry;
use svc_handler::{ServerConfig, ServiceServer};
use svc_session::SessionSigner;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config = ServerConfig::from_env().context("failed to load configuration")?;
    let secret = config.session.secret_key().context("refusing to start")?;
    let signer = Arc::new(SessionSigner::new(&secret).context("invalid session secret")?);

    let registry = build_registry(signer).context("failed to register chat services")?;
    let server = ServiceServer::new(config, registry)?;

    info!(addr = %server.config().http_addr(), "Starting chat server");
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => error!(error = %e, "Failed to listen for ctrl-c"),
        }
    };

    server.start(shutdown).await?;
    Ok(())
}
