//! Unified error types for the toolbox domain layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A command referenced a session that is not (or no longer) open.
    SessionNotFound,
    /// A command named a tool absent from the registry.
    UnknownTool,
    /// Tool arguments failed schema validation.
    InvalidArguments,
    /// The tool handler reported a domain failure.
    HandlerFailure,
    /// Writing to a session's stream failed.
    Transport,
    /// Configuration could not be loaded.
    Config,
    /// Internal error.
    Internal,
}

/// Domain-level error with structured context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolboxError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional context.
    pub context: Option<String>,
}

impl ToolboxError {
    /// Creates a new `ToolboxError`.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    /// Adds context to the error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ToolboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolboxError {}

/// Transforms technical errors into user-actionable diagnostics.
///
/// Implementors provide optional `hint` (cause explanation) and `fix`
/// (concrete remediation step) for each error variant.
pub trait DiagnosticError {
    /// A human-readable explanation of the likely cause.
    fn hint(&self) -> Option<String> {
        None
    }
    /// A concrete fix the user can apply (e.g. a config change).
    fn fix(&self) -> Option<String> {
        None
    }
}
