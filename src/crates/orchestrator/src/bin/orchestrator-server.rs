//! Orchestrator server binary
//!
//! Serves the feedback-loop WebSocket, the MCP status probe and a health
//! check.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use orchestrator::api::{create_router, AppState};
use orchestrator::config::ServerConfig;
use tooling::logging::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "orchestrator-server", version, about = "Store operations feedback-loop server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ORCHESTRATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding config and HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding config and PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("validating configuration")?;

    init_tracing(&config.server.log_filter);

    tracing::info!(
        model = %config.gemini.model,
        mcp_command = %config.mcp.command,
        default_max_iterations = config.workflow.default_max_iterations,
        "configuration loaded"
    );
    if config.gemini.api_key().is_none() {
        tracing::warn!(
            env = %config.gemini.api_key_env,
            "Gemini API key not set; feedback-loop sessions will be refused"
        );
    }

    let addr = config.bind_addr();
    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("Starting orchestrator server on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Orchestrator server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
