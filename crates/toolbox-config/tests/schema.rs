//! Integration tests for toolbox-config schema types.

use std::time::Duration;

use toolbox_config::schema::{FetchConfig, LoggingConfig, SessionConfig, ToolboxConfig};

#[test]
fn toolbox_config_default_values() {
    let config = ToolboxConfig::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8049);
    assert_eq!(config.session.channel_capacity, 64);
    assert_eq!(config.session.keep_alive_secs, 15);
    assert_eq!(config.session.max_sessions, 0);
    assert_eq!(config.fetch.timeout_secs, 30);
    assert!(config.fetch.user_agent.starts_with("toolbox-mcp-server/"));
    assert!(config.search.google_api_key.is_none());
    assert_eq!(
        config.search.endpoint,
        "https://www.googleapis.com/customsearch/v1"
    );
    assert_eq!(config.logging.level, "info");
}

#[test]
fn toolbox_config_serde_roundtrip() {
    let config = ToolboxConfig::default();
    let json = serde_json::to_string(&config).expect("serialize");
    let back: ToolboxConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.server.port, config.server.port);
    assert_eq!(back.session.channel_capacity, config.session.channel_capacity);
}

#[test]
fn fetch_timeout_returns_duration() {
    let fetch = FetchConfig {
        timeout_secs: 5,
        ..FetchConfig::default()
    };
    assert_eq!(fetch.timeout(), Duration::from_secs(5));
}

#[test]
fn session_keep_alive_returns_duration() {
    assert_eq!(SessionConfig::default().keep_alive(), Duration::from_secs(15));
}

#[test]
fn logging_default_level() {
    assert_eq!(LoggingConfig::default().level, "info");
}

#[test]
fn deny_unknown_fields_rejects_extra_key() {
    let json = r#"{"server":{},"runtime":{"pool_size":3}}"#;
    let result: Result<ToolboxConfig, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

#[test]
fn partial_config_uses_defaults_for_missing() {
    let json = r#"{"server":{"port":9000},"session":{"max_sessions":8}}"#;
    let config: ToolboxConfig = serde_json::from_str(json).expect("parse");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.session.max_sessions, 8);
    assert_eq!(config.session.channel_capacity, 64);
}
