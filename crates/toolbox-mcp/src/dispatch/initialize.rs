//! Handles the `initialize` MCP method.

use serde_json::Value;
use tracing::info;

use toolbox_protocol::mcp::initialize::{
    InitializeParams, InitializeResult, ServerCapabilities, ServerInfo, ToolCapability,
    PROTOCOL_VERSION,
};
use toolbox_protocol::{error_codes, RequestId};

use crate::handler::{JsonRpcOutput, SERVER_NAME};

/// Handles the `initialize` request and returns the server capabilities.
///
/// The server always answers with the protocol version it implements.
pub(crate) fn handle_initialize(id: RequestId, params: &Option<Value>) -> JsonRpcOutput {
    if let Some(p) = params {
        match serde_json::from_value::<InitializeParams>(p.clone()) {
            Ok(params) => info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                requested = %params.protocol_version,
                "client initializing"
            ),
            Err(e) => {
                return JsonRpcOutput::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid initialize params: {e}"),
                );
            }
        }
    }

    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolCapability::default()),
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    JsonRpcOutput::from_result(id, result)
}
