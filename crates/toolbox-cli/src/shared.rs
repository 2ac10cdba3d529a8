//! Shared helpers used across CLI commands.
//!
//! Centralises turning a loaded `ToolboxConfig` into the settings each
//! layer expects, so `serve` and `call` build identical handlers.

use std::path::Path;
use std::sync::Arc;

use toolbox_config::{load_config, ToolboxConfig};
use toolbox_mcp::McpHandler;
use toolbox_tools::{builtin_registry, ToolsConfig};
use toolbox_types::{ErrorKind, ToolboxError};
use toolbox_transport_sse::SseSettings;

use crate::output;

/// Loads configuration, printing diagnostics on failure.
///
/// # Errors
///
/// Returns an error if the file is missing or a layer holds invalid values.
pub fn load(path: Option<&Path>) -> anyhow::Result<ToolboxConfig> {
    load_config(path).map_err(|e| {
        output::print_diagnostic(&e);
        ToolboxError::from(e).into()
    })
}

/// Settings for the network-bound tools.
pub fn tools_config(config: &ToolboxConfig) -> ToolsConfig {
    ToolsConfig {
        http_timeout: config.fetch.timeout(),
        user_agent: config.fetch.user_agent.clone(),
        google_api_key: config.search.google_api_key.clone(),
        google_cx: config.search.google_cx.clone(),
        search_endpoint: config.search.endpoint.clone(),
    }
}

/// Per-stream settings for the SSE transport.
pub fn sse_settings(config: &ToolboxConfig) -> SseSettings {
    SseSettings {
        channel_capacity: config.session.channel_capacity,
        keep_alive: config.session.keep_alive(),
    }
}

/// Builds the dispatcher over every built-in tool.
///
/// # Errors
///
/// Returns an error if two built-in tools share a name.
pub fn build_handler(config: &ToolboxConfig) -> anyhow::Result<McpHandler> {
    let registry = builtin_registry(&tools_config(config))
        .map_err(|e| ToolboxError::new(ErrorKind::Internal, format!("registry error: {e}")))?;
    tracing::debug!(tools = registry.len(), "tool registry ready");
    Ok(McpHandler::new(Arc::new(registry)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tools_config_follows_fetch_and_search() {
        let mut config = ToolboxConfig::default();
        config.fetch.timeout_secs = 5;
        config.fetch.user_agent = "toolbox-test/1".into();
        config.search.google_api_key = Some("k".into());
        config.search.google_cx = Some("c".into());
        config.search.endpoint = "http://127.0.0.1:9/search".into();

        let tools = tools_config(&config);
        assert_eq!(tools.http_timeout, Duration::from_secs(5));
        assert_eq!(tools.user_agent, "toolbox-test/1");
        assert_eq!(tools.google_api_key.as_deref(), Some("k"));
        assert_eq!(tools.google_cx.as_deref(), Some("c"));
        assert_eq!(tools.search_endpoint, "http://127.0.0.1:9/search");
    }

    #[test]
    fn sse_settings_follow_session_section() {
        let mut config = ToolboxConfig::default();
        config.session.channel_capacity = 8;
        config.session.keep_alive_secs = 3;

        let settings = sse_settings(&config);
        assert_eq!(settings.channel_capacity, 8);
        assert_eq!(settings.keep_alive, Duration::from_secs(3));
    }

    #[test]
    fn handler_holds_all_builtin_tools() {
        let handler = build_handler(&ToolboxConfig::default()).expect("handler");
        assert_eq!(handler.registry().len(), 9);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(Some(&dir.path().join("absent.toml"))).expect_err("missing file");
        assert!(err.to_string().contains("not found"));
        let domain = err.downcast_ref::<ToolboxError>().expect("domain error");
        assert_eq!(domain.kind, ErrorKind::Config);
    }
}
