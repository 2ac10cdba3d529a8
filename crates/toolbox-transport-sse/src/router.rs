//! Axum router for the MCP SSE transport.
//! Routes: `GET /mcp` (event stream), `POST /mcp/messages` (commands),
//! `GET /health` (liveness), `GET /health/ready` (readiness).

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use toolbox_mcp::McpHandler;
use toolbox_protocol::IncomingMessage;
use toolbox_types::SessionId;

use crate::error::TransportError;
use crate::session::{Frame, SessionGuard, SessionHandle, SessionStore};

/// Path of the event stream endpoint.
pub const STREAM_PATH: &str = "/mcp";
/// Path of the command endpoint.
pub const MESSAGES_PATH: &str = "/mcp/messages";

/// Per-stream tuning.
#[derive(Debug, Clone)]
pub struct SseSettings {
    /// Capacity of each session's frame channel.
    pub channel_capacity: usize,
    /// Interval between keep-alive comments.
    pub keep_alive: Duration,
}

impl Default for SseSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            keep_alive: Duration::from_secs(15),
        }
    }
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP request dispatcher.
    pub handler: Arc<McpHandler>,
    /// Open sessions.
    pub sessions: Arc<SessionStore>,
    /// Stream settings.
    pub settings: SseSettings,
}

impl AppState {
    /// Bundles the shared state.
    pub fn new(handler: Arc<McpHandler>, sessions: Arc<SessionStore>, settings: SseSettings) -> Self {
        Self {
            handler,
            sessions,
            settings,
        }
    }
}

/// Builds the axum `Router` with all MCP routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(STREAM_PATH, get(handle_stream))
        .route(MESSAGES_PATH, post(handle_message))
        .route("/health", get(handle_health))
        .route("/health/ready", get(handle_ready))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Logs every inbound request with its outcome.
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "toolbox"}))
}

/// Readiness check, with the number of open sessions.
async fn handle_ready(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ready",
        "service": "toolbox",
        "sessions": state.sessions.len(),
        "tools": state.handler.registry().len(),
    }))
}

/// Opens a session and streams its frames as SSE events.
async fn handle_stream(State(state): State<AppState>) -> Response {
    let (sender, mut frames) = mpsc::channel::<Frame>(state.settings.channel_capacity.max(1));
    let (closer, mut closed) = oneshot::channel::<()>();

    let id = match state.sessions.create(sender, closer) {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "refusing event stream");
            return e.into_response();
        }
    };
    info!(session = %id, "session opened");

    let guard = SessionGuard::new(Arc::clone(&state.sessions), id.clone());
    let endpoint = format!("{MESSAGES_PATH}?sessionId={id}");

    let stream = async_stream::stream! {
        let _guard = guard;
        yield Ok::<Event, Infallible>(Event::default().event("endpoint").data(endpoint));
        loop {
            let next = tokio::select! {
                frame = frames.recv() => frame,
                _ = &mut closed => None,
            };
            match next {
                Some(frame) => yield Ok(Event::default().event("message").data(frame)),
                None => break,
            }
        }
    };

    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(state.settings.keep_alive))
        .into_response()
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Accepts one JSON-RPC message for an open session.
///
/// The reply is `202 Accepted` as soon as the message is parsed; the
/// JSON-RPC response travels on the session's event stream.
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> Response {
    let Some(raw_id) = query.session_id.filter(|s| !s.is_empty()) else {
        warn!("command without sessionId");
        return (StatusCode::BAD_REQUEST, "Missing sessionId parameter").into_response();
    };
    let id = SessionId::from(raw_id);

    let session = match state.sessions.get(&id) {
        Some(session) => session,
        None => {
            warn!(session = %id, "command for unknown session");
            return TransportError::SessionNotFound { id }.into_response();
        }
    };

    let message = match IncomingMessage::parse(&body) {
        Ok(m) => m,
        Err(e) => {
            warn!(session = %id, error = %e, "rejecting malformed command");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    debug!(session = %id, method = message.method(), "command accepted");
    tokio::spawn(dispatch_to_session(
        Arc::clone(&state.handler),
        session,
        message,
    ));

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Dispatches a message and writes the response to the session stream.
async fn dispatch_to_session(handler: Arc<McpHandler>, session: SessionHandle, message: IncomingMessage) {
    let Some(output) = handler.handle_message(message).await else {
        return;
    };

    let frame = match output.to_json() {
        Ok(frame) => frame,
        Err(e) => {
            error!(session = %session.id(), error = %e, "failed to serialize response");
            return;
        }
    };

    if let Err(e) = session.send(frame).await {
        debug!(session = %session.id(), error = %e, "response dropped, stream closed");
    }
}
