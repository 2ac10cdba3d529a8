//! SSE server that binds the axum Router to a TCP socket.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::error::TransportError;
use crate::router::{build_router, AppState};

/// Axum-based HTTP server for the MCP SSE transport.
pub struct SseServer {
    pub(crate) addr: SocketAddr,
    pub(crate) state: AppState,
}

impl SseServer {
    /// Creates a new server listening on `addr`.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// The configured listen address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds the socket and serves until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run<F>(self, shutdown: F) -> Result<(), TransportError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| TransportError::Bind {
                addr: self.addr.to_string(),
                source: e,
            })?;
        serve(listener, self.state, shutdown).await
    }
}

/// Serves on an already-bound listener until `shutdown` resolves.
///
/// On shutdown every session is closed first, so open event streams end
/// and the graceful drain can complete.
///
/// # Errors
///
/// Returns `TransportError::Serve` if the server fails while running.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), TransportError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| TransportError::Serve(e.to_string()))?;
    info!(addr = %local, "toolbox MCP SSE server ready");

    let sessions = state.sessions.clone();
    let router = build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let closed = sessions.close_all();
            info!(sessions = closed, "shutting down, closed open sessions");
        })
        .await
        .map_err(|e| TransportError::Serve(e.to_string()))?;

    info!("server stopped");
    Ok(())
}
