//! # toolbox-tools
//!
//! Built-in tools exposed over MCP. Every tool is a stateless
//! [`ToolHandler`]; [`builtin_registry`] wires them into a [`ToolRegistry`].

pub mod calculator;
pub mod codec;
pub mod echo;
mod expr;
mod html;
pub mod random;
pub mod system_info;
pub mod time;
pub mod web_fetch;
pub mod web_search;

use std::sync::Arc;
use std::time::Duration;

use toolbox_registry::{RegistryError, ToolHandler, ToolRegistry};

/// Default Google Custom Search endpoint.
pub const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Settings for the network-bound tools.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Timeout for `web_fetch` and `web_search` requests.
    pub http_timeout: Duration,
    /// `User-Agent` header sent by the HTTP tools.
    pub user_agent: String,
    /// Google API key for `web_search`.
    pub google_api_key: Option<String>,
    /// Google Custom Search Engine id for `web_search`.
    pub google_cx: Option<String>,
    /// Search endpoint (overridable for testing).
    pub search_endpoint: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
            user_agent: format!("toolbox-mcp-server/{}", env!("CARGO_PKG_VERSION")),
            google_api_key: None,
            google_cx: None,
            search_endpoint: GOOGLE_SEARCH_ENDPOINT.to_string(),
        }
    }
}

/// Builds the shared HTTP client used by the network-bound tools.
pub(crate) fn http_client(config: &ToolsConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.http_timeout)
        .build()
        .unwrap_or_default()
}

/// Creates a registry holding every built-in tool.
///
/// # Errors
///
/// Returns `RegistryError::Duplicate` if two tools share a name.
pub fn builtin_registry(config: &ToolsConfig) -> Result<ToolRegistry, RegistryError> {
    let client = http_client(config);
    let tools: Vec<Arc<dyn ToolHandler>> = vec![
        Arc::new(echo::EchoTool),
        Arc::new(time::TimeTool),
        Arc::new(random::RandomTool),
        Arc::new(codec::EncoderTool),
        Arc::new(codec::DecoderTool),
        Arc::new(calculator::CalculatorTool),
        Arc::new(web_fetch::WebFetchTool::new(client.clone())),
        Arc::new(system_info::SystemInfoTool),
        Arc::new(web_search::WebSearchTool::new(client, config)),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool)?;
    }
    Ok(registry)
}
