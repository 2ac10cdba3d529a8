//! Configuration schema types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level toolbox configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Listen address.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session and stream settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// `web_fetch` / shared HTTP client settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// `web_search` settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, with IPv6 hosts bracketed.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8049
}

/// Session store and event stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Frames buffered per session before writers wait.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Seconds between keep-alive comments on idle streams.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    /// Maximum open sessions; 0 means unlimited.
    #[serde(default)]
    pub max_sessions: usize,
}

impl SessionConfig {
    /// Returns the keep-alive interval as a `Duration`.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            keep_alive_secs: default_keep_alive_secs(),
            max_sessions: 0,
        }
    }
}

fn default_channel_capacity() -> usize {
    64
}
fn default_keep_alive_secs() -> u64 {
    15
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl FetchConfig {
    /// Returns the timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("toolbox-mcp-server/{}", env!("CARGO_PKG_VERSION"))
}

/// Google Custom Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    /// Custom Search Engine id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_cx: Option<String>,
    /// Search API endpoint.
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_cx: None,
            endpoint: default_search_endpoint(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "toolbox_mcp=trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
