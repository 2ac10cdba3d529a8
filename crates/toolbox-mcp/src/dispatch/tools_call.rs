//! Handles the `tools/call` MCP method.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use toolbox_protocol::mcp::tools::{ToolsCallParams, ToolsCallResult};
use toolbox_protocol::{error_codes, RequestId};
use toolbox_registry::ToolRegistry;

use crate::failure::DispatchFailure;
use crate::handler::JsonRpcOutput;

/// Handles the `tools/call` request.
///
/// Only malformed params produce a JSON-RPC error. Every tool-level
/// failure becomes an `isError` result.
pub(crate) async fn handle_tools_call(
    id: RequestId,
    params: &Option<Value>,
    registry: &ToolRegistry,
) -> JsonRpcOutput {
    // 1. Parse params
    let call_params = match params {
        Some(p) => match serde_json::from_value::<ToolsCallParams>(p.clone()) {
            Ok(cp) => cp,
            Err(e) => {
                return JsonRpcOutput::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid tools/call params: {e}"),
                );
            }
        },
        None => {
            return JsonRpcOutput::error(
                id,
                error_codes::INVALID_PARAMS,
                "tools/call requires params",
            );
        }
    };

    // 2. Execute, folding failures into the result
    let result = match execute(registry, &call_params.name, &call_params.arguments).await {
        Ok(result) => result,
        Err(failure) => {
            debug!(tool = %call_params.name, kind = ?failure.kind(), %failure, "tool call failed");
            failure.into_result()
        }
    };

    JsonRpcOutput::from_result(id, result)
}

/// Looks up, validates and runs a tool.
///
/// The handler runs on its own task so a panic is contained and reported
/// as [`DispatchFailure::Panicked`].
pub(crate) async fn execute(
    registry: &ToolRegistry,
    name: &str,
    arguments: &Value,
) -> Result<ToolsCallResult, DispatchFailure> {
    let tool = registry
        .get(name)
        .ok_or_else(|| DispatchFailure::UnknownTool {
            name: name.to_string(),
        })?;

    let args = tool.input_schema().validate(arguments).map_err(|e| {
        warn!(tool = name, error = %e, "invalid tool arguments");
        DispatchFailure::from(e)
    })?;

    debug!(tool = name, "executing tool");
    let handler = Arc::clone(&tool);
    match tokio::spawn(async move { handler.call(args).await }).await {
        Ok(outcome) => Ok(outcome?),
        Err(join) => {
            error!(tool = name, error = %join, "tool task aborted");
            Err(DispatchFailure::Panicked {
                name: name.to_string(),
            })
        }
    }
}
