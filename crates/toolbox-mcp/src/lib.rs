//! # toolbox-mcp
//!
//! MCP method dispatch handler (APPLICATION layer).
//!
//! Provides `McpHandler` and `JsonRpcOutput` for routing JSON-RPC requests
//! to the appropriate MCP method implementations. Transport adapters own
//! the wire; this crate only maps one request to one response.

mod dispatch;
pub mod failure;
pub mod handler;

pub use failure::DispatchFailure;
pub use handler::{JsonRpcOutput, McpHandler, SERVER_NAME};
