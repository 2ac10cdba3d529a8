//! In-memory tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::handler::ToolHandler;

/// Errors returned when building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A tool with the same name is already registered.
    #[error("tool already registered: {name}")]
    Duplicate { name: String },
}

/// Maps tool names to handlers.
///
/// Built once at startup and shared read-only afterwards. Listing order
/// follows registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its own name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Duplicate` if the name is taken.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), RegistryError> {
        let name = handler.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(handler);
        Ok(())
    }

    /// Looks up a handler by tool name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// All handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ToolHandler>> {
        self.tools.iter()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| t.name()))
            .finish()
    }
}
