//! Abstract tool contract (port) implemented by every tool.

use async_trait::async_trait;
use thiserror::Error;

use toolbox_protocol::mcp::tools::{McpToolDefinition, ToolsCallResult};
use toolbox_protocol::{InputSchema, ValidatedArgs};

/// Domain failures a tool handler may report.
///
/// The dispatcher turns these into `isError` results; they never end a
/// session.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input passed validation but the tool cannot process it.
    #[error("{0}")]
    InvalidInput(String),
    /// A remote service failed or answered with an error.
    #[error("{0}")]
    Upstream(String),
    /// The tool needs configuration that is missing.
    #[error("{0}")]
    NotConfigured(String),
}

impl ToolError {
    /// Creates an invalid-input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}

/// A named, stateless operation with a declared argument schema.
///
/// Handlers receive arguments that already passed validation against
/// [`ToolHandler::input_schema`] and return a wire-ready result.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name (registry key).
    fn name(&self) -> &str;

    /// Human-readable title.
    fn title(&self) -> &str;

    /// Description advertised to clients.
    fn description(&self) -> &str;

    /// Declared arguments.
    fn input_schema(&self) -> InputSchema;

    /// Runs the tool.
    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError>;

    /// Builds the `tools/list` entry for this tool.
    fn definition(&self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            title: Some(self.title().to_string()),
            description: Some(self.description().to_string()),
            input_schema: self.input_schema().to_json_schema(),
        }
    }
}
