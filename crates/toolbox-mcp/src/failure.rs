//! Tool dispatch failures.

use thiserror::Error;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::SchemaError;
use toolbox_registry::ToolError;
use toolbox_types::{ErrorKind, ToolboxError};

/// Why a `tools/call` did not produce a normal result.
///
/// Every variant is reported to the client as an `isError` tool result
/// rather than a JSON-RPC error, so a misbehaving tool never ends the
/// session.
#[derive(Debug, Error)]
pub enum DispatchFailure {
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },
    /// The arguments violate the tool's schema; the handler was not run.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] SchemaError),
    /// The handler returned an error.
    #[error("Error: {0}")]
    HandlerFailure(#[from] ToolError),
    /// The handler panicked or was cancelled.
    #[error("Error: tool '{name}' failed unexpectedly")]
    Panicked { name: String },
}

impl DispatchFailure {
    /// Domain classification of the failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool { .. } => ErrorKind::UnknownTool,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::HandlerFailure(_) => ErrorKind::HandlerFailure,
            Self::Panicked { .. } => ErrorKind::Internal,
        }
    }

    /// Renders the failure as an `isError` tool result.
    pub fn into_result(self) -> ToolsCallResult {
        ToolsCallResult::error(self.to_string())
    }
}

impl From<DispatchFailure> for ToolboxError {
    fn from(f: DispatchFailure) -> Self {
        ToolboxError::new(f.kind(), f.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_text() {
        let unknown = DispatchFailure::UnknownTool {
            name: "nope".into(),
        };
        assert_eq!(unknown.to_string(), "Unknown tool: nope");

        let invalid = DispatchFailure::from(SchemaError::MissingField {
            field: "text".into(),
        });
        assert_eq!(
            invalid.to_string(),
            "Invalid arguments: missing required field: text"
        );

        let failed = DispatchFailure::from(ToolError::upstream("boom"));
        assert_eq!(failed.to_string(), "Error: boom");
    }

    #[test]
    fn into_result_sets_is_error() {
        let result = DispatchFailure::Panicked { name: "x".into() }.into_result();
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Error: tool 'x' failed unexpectedly");
    }

    #[test]
    fn converts_into_domain_error() {
        let domain = ToolboxError::from(DispatchFailure::UnknownTool {
            name: "nope".into(),
        });
        assert_eq!(domain.kind, ErrorKind::UnknownTool);
        assert_eq!(domain.message, "Unknown tool: nope");

        let handler = ToolboxError::from(DispatchFailure::from(ToolError::upstream("boom")));
        assert_eq!(handler.kind, ErrorKind::HandlerFailure);

        let panicked = DispatchFailure::Panicked { name: "x".into() };
        assert_eq!(panicked.kind(), ErrorKind::Internal);
    }
}
