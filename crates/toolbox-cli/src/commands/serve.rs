//! `toolbox serve` command.
//!
//! Starts the MCP server over SSE, exposing the built-in tools via
//! JSON-RPC 2.0.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Args;

use toolbox_config::ToolboxConfig;
use toolbox_transport_sse::{AppState, SessionStore, SseServer};
use toolbox_types::ToolboxError;

use crate::{output, shared};

/// Start the MCP server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,
    /// TCP port (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Applies flag overrides on top of the loaded configuration.
    fn apply(&self, config: &mut ToolboxConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Executes the serve command.
pub async fn execute(args: &ServeArgs, mut config: ToolboxConfig) -> anyhow::Result<()> {
    args.apply(&mut config);

    let bind = config.server.bind_address();
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address {bind}: {e}"))?;

    let handler = Arc::new(shared::build_handler(&config)?);
    let sessions = Arc::new(SessionStore::new(config.session.max_sessions));
    let state = AppState::new(handler, sessions, shared::sse_settings(&config));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        tracing::info!("shutdown signal received");
    };

    SseServer::new(addr, state).run(shutdown).await.map_err(|e| {
        output::print_diagnostic(&e);
        ToolboxError::from(e).with_context(format!("listen address {addr}")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = ServeArgs {
            host: Some("127.0.0.1".into()),
            port: Some(9000),
        };
        let mut config = ToolboxConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = ServeArgs {
            host: None,
            port: None,
        };
        let mut config = ToolboxConfig::default();
        config.server.port = 7001;
        args.apply(&mut config);
        assert_eq!(config.server.bind_address(), "0.0.0.0:7001");
    }
}
