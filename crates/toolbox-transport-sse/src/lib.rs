//! Session-multiplexed SSE transport adapter for the toolbox server.
//!
//! Clients open `GET /mcp` to receive an event stream and a session id,
//! then send JSON-RPC messages to `POST /mcp/messages?sessionId=<id>`.
//! Responses are delivered as `message` events on the matching stream.

mod error;
pub mod router;
pub mod server;
pub mod session;

pub use error::TransportError;
pub use router::{build_router, AppState, SseSettings, MESSAGES_PATH, STREAM_PATH};
pub use server::{serve, SseServer};
pub use session::{SessionGuard, SessionHandle, SessionStore};
