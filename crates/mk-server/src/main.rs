//! `mcp-server-make`: serves the `make` tool over MCP stdio.
//!
//! Logs go to stderr; stdout carries the MCP protocol. With `--http-addr`
//! the same executor is also reachable over HTTP.
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mk_api::{ExecutorAdapter, HttpApi, MakeServerHandler};
use mk_exec::{CancellationToken, Executor, Subscribe};
use mk_observe::{Journal, logger_init};
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{error, info};

mod config;
mod shutdown;

use config::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger_init(&args.logger_config()).context("failed to initialize logger")?;

    let cfg = args.executor_config();
    info!(
        make_path = %cfg.program.display(),
        workdir = %cfg.workdir.display(),
        timeout_s = cfg.timeout.as_secs(),
        max_concurrent = cfg.max_concurrent,
        "starting make MCP server"
    );

    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Journal::new())];
    let executor = Arc::new(Executor::new(cfg, subscribers).context("invalid configuration")?);
    let shutdown = CancellationToken::new();
    let api = Arc::new(ExecutorAdapter::new(Arc::clone(&executor), shutdown.clone()));

    let signals = tokio::spawn(shutdown::watch(Arc::clone(&executor), shutdown.clone()));

    let http = match args.http_addr {
        Some(addr) => Some(serve_http(addr, Arc::clone(&api), shutdown.clone()).await?),
        None => None,
    };

    info!("serving MCP on stdio");
    let service = MakeServerHandler::new(api)
        .serve_with_ct(stdio(), shutdown.clone())
        .await
        .context("failed to start MCP service")?;

    match service.waiting().await {
        Ok(reason) => info!(?reason, "MCP service stopped"),
        Err(e) => error!(error = %e, "MCP service task failed"),
    }

    shutdown::drain(&executor, &shutdown);
    if let Some(http) = http {
        if let Err(e) = http.await {
            error!(error = %e, "HTTP server task failed");
        }
    }
    signals.abort();

    info!("server shutdown complete");
    Ok(())
}

/// Bind `addr` and serve the HTTP API until `shutdown` fires.
async fn serve_http(
    addr: std::net::SocketAddr,
    api: Arc<ExecutorAdapter>,
    shutdown: CancellationToken,
) -> Result<JoinHandle<()>> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;
    info!(%addr, "serving HTTP API");

    let app = HttpApi::new(api).router();
    Ok(tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown.cancelled_owned());
        if let Err(e) = server.await {
            error!(error = %e, "HTTP server error");
        }
    }))
}
