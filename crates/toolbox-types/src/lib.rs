//! # toolbox-types
//!
//! Domain types for the toolbox MCP server.
//! This crate contains pure data types: session identity, declarative
//! tool argument specs and the unified domain error.

pub mod error;
pub mod session;
pub mod tool;

// Re-exports for convenience.
pub use error::{DiagnosticError, ErrorKind, ToolboxError};
pub use session::SessionId;
pub use tool::{ArgType, StringFormat, ToolArgument};
