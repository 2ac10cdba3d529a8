//! Error types for the SSE transport layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use toolbox_types::{DiagnosticError, ErrorKind, SessionId, ToolboxError};

/// Errors that can occur in the SSE transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to the TCP address.
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        /// The address string.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server encountered an I/O error while serving.
    #[error("server error: {0}")]
    Serve(String),
    /// A command referenced a session that is not open.
    #[error("No transport found for sessionId")]
    SessionNotFound {
        /// The id the client sent.
        id: SessionId,
    },
    /// The configured session limit is reached.
    #[error("session limit reached ({max} open sessions)")]
    SessionLimit {
        /// Configured maximum.
        max: usize,
    },
    /// The server is shutting down and accepts no new sessions.
    #[error("server is shutting down")]
    ShuttingDown,
    /// The session's stream is gone; the frame was not delivered.
    #[error("session channel closed")]
    ChannelClosed,
}

impl From<TransportError> for ToolboxError {
    fn from(e: TransportError) -> Self {
        let kind = match &e {
            TransportError::SessionNotFound { .. } => ErrorKind::SessionNotFound,
            TransportError::ChannelClosed => ErrorKind::Transport,
            TransportError::Bind { .. }
            | TransportError::Serve(_)
            | TransportError::SessionLimit { .. }
            | TransportError::ShuttingDown => ErrorKind::Internal,
        };
        ToolboxError::new(kind, e.to_string())
    }
}

impl DiagnosticError for TransportError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse => {
                Some("Another process is already listening on this port.".into())
            }
            Self::Bind { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                Some("Ports below 1024 usually require elevated privileges.".into())
            }
            Self::SessionNotFound { .. } => Some(
                "The event stream for this session was closed, or never opened.".into(),
            ),
            Self::SessionLimit { .. } => {
                Some("Every session slot is held by an open event stream.".into())
            }
            _ => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::Bind { .. } => {
                Some("Pick another port: toolbox serve --port 8050 (or set PORT)".into())
            }
            Self::SessionNotFound { .. } => {
                Some("Reconnect to GET /mcp and use the new sessionId.".into())
            }
            Self::SessionLimit { .. } => Some(
                "Raise the limit in config:\n  [session]\n  max_sessions = 0  # unlimited".into(),
            ),
            _ => None,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::SessionNotFound { .. } => StatusCode::BAD_REQUEST,
            Self::SessionLimit { .. } | Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::ChannelClosed => StatusCode::GONE,
            Self::Bind { .. } | Self::Serve(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
