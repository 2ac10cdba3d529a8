//! # toolbox-registry
//!
//! The tool contract (`ToolHandler`) and the registry mapping tool names
//! to handlers. Handler implementations live in `toolbox-tools`.

pub mod handler;
pub mod registry;

pub use handler::{ToolError, ToolHandler};
pub use registry::{RegistryError, ToolRegistry};
