//! HTTP server implementation.
//!
//! This module provides the main [`EdgeServer`] struct for running the
//! edge server.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use spa_edge_common::{EdgeConfig, EdgeError};

use crate::router::build_router;
use crate::state::AppState;

/// The edge HTTP server.
///
/// Owns the application state and the listener configuration. Startup is
/// all-or-nothing: if the configured port cannot be bound the error is
/// returned and the process is expected to exit non-zero, with no retry.
pub struct EdgeServer {
    /// Application state.
    state: AppState,
    /// Listening port.
    port: u16,
}

impl EdgeServer {
    /// Create a new server instance from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the telemetry log sinks cannot be opened.
    pub fn new(config: &EdgeConfig) -> Result<Self, EdgeError> {
        let state = AppState::new(config)?;

        Ok(Self {
            state,
            port: config.server.port,
        })
    }

    /// Get the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind the configured port and serve until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeError::Bind`] if the port cannot be bound.
    pub async fn run(self) -> Result<(), EdgeError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| EdgeError::bind(addr, e))?;

        info!(addr = %addr, "Edge server listening");

        let app = build_router(self.state);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }

    /// Start the server and return a handle for testing.
    ///
    /// The server binds an ephemeral port (127.0.0.1:0) and returns a
    /// handle that exposes the actual address and can shut the server down.
    pub async fn start_test(config: &EdgeConfig) -> Result<TestHandle, EdgeError> {
        let state = AppState::new(config)?;
        let app = build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
        });

        Ok(TestHandle {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }
}

/// Handle for a test server instance.
pub struct TestHandle {
    /// The address the server is bound to.
    addr: SocketAddr,
    /// Application state.
    state: AppState,
    /// Shutdown signal sender.
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    /// Server task handle.
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestHandle {
    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the server URL.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the application state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Shutdown the server gracefully.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
