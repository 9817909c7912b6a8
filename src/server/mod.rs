//! HTTP serving of the output directory with single-page-app routing
//!
//! Lookup order for every request:
//! 1. `GET`/`HEAD` for a file in the output directory serves that file.
//! 2. `GET`/`HEAD` under the project mount serves from the front-end root.
//! 3. Anything else, any method, any depth, receives the output `index.html`.
//!
//! The output directory is read at request time. Unless a readiness gate is
//! configured, requests arriving before the orchestration cycle finishes see
//! whatever the directory holds at that moment.

mod files;
mod routes;

use crate::config::{ServerConfig, PROJECT_MOUNT};
use crate::pipeline::ContentReady;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

pub use files::{content_type_for, percent_decode, sanitize_rel_path};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Holds requests until content is ready, for at most `timeout`.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    pub ready: ContentReady,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub output_dir: PathBuf,
    pub project_root: PathBuf,
    /// First path segment of the project mount, without slashes
    pub mount: String,
    pub gate: Option<ReadyGate>,
}

impl AppState {
    pub fn new(output_dir: impl Into<PathBuf>, project_root: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            project_root: project_root.into(),
            mount: PROJECT_MOUNT.trim_matches('/').to_string(),
            gate: None,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.output_dir(), config.frontend_root.clone())
    }

    pub fn with_gate(mut self, gate: Option<ReadyGate>) -> Self {
        self.gate = gate;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(routes::serve_request)
        .with_state(Arc::new(state))
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr().unwrap_or(addr);
    info!("Server running at http://{}/", local);
    Ok(listener)
}

pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
