//! VibeMail - Outreach server entry point

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vibemail_api::AppState;
use vibemail_common::config::{Config, LoggingConfig};
use vibemail_core::{create_assistant, Copywriter, EngineMonitor, SimulationWorker};
use vibemail_storage::{create_storage, SlotStorage, Workspace};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting VibeMail on {}...", config.server.hostname);

    // Initialize slot storage and load collections
    let storage: Arc<dyn SlotStorage> = Arc::from(create_storage(&config.storage)?);
    let workspace = Arc::new(Workspace::load(storage).await?);
    info!("Workspace loaded ({} backend)", config.storage.backend);

    // Initialize AI assistant
    let copywriter = Copywriter::new(
        create_assistant(&config.assistant),
        config.assistant.copy_context.clone(),
    );

    let shutdown = CancellationToken::new();
    let monitor = Arc::new(EngineMonitor::new());

    // Start simulation worker
    let worker_handle = if config.engine.enabled {
        let worker = SimulationWorker::new(workspace.clone(), &config.engine)
            .with_monitor(monitor.clone());
        let token = shutdown.clone();
        info!(
            "Starting simulation worker (every {}s)",
            config.engine.tick_interval_secs
        );

        Some(tokio::spawn(async move {
            worker.run(token).await;
        }))
    } else {
        info!("Simulation worker disabled");
        None
    };

    // Start API server
    let state = Arc::new(AppState::new(
        workspace,
        copywriter,
        monitor,
        config.engine.clone(),
    ));
    let app = vibemail_api::create_router(state, &config.api);

    let addr = format!("{}:{}", config.server.bind_address, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;
    info!("API server listening on {}", addr);

    let token = shutdown.clone();
    let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
        token.cancel();
    });

    if let Err(e) = serve.await {
        error!("API server error: {}", e);
    }

    // Stop the worker after in-flight requests drain
    shutdown.cancel();
    if let Some(handle) = worker_handle {
        if let Err(e) = handle.await {
            error!("Simulation worker task failed: {}", e);
        }
    }

    info!("VibeMail shutdown complete");

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},vibemail=debug", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_level(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}
