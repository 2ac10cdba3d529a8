//! # toolbox-protocol
//!
//! MCP protocol and JSON-RPC 2.0 type definitions.
//! This crate defines the wire format exchanged between MCP clients and
//! the toolbox server, plus the declarative tool input schemas.

pub mod jsonrpc;
pub mod mcp;
pub mod schema;

pub use jsonrpc::*;
pub use mcp::methods;
pub use schema::{InputSchema, SchemaError, ValidatedArgs};
