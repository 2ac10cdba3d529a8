//! Handles the `tools/list` MCP method.

use serde_json::Value;

use toolbox_protocol::mcp::tools::{McpToolDefinition, ToolsListParams, ToolsListResult};
use toolbox_protocol::{error_codes, RequestId};
use toolbox_registry::ToolRegistry;

use crate::handler::JsonRpcOutput;

/// Handles the `tools/list` request.
///
/// The registry is small and fixed, so everything fits on one page and
/// `nextCursor` is never set.
pub(crate) fn handle_tools_list(
    id: RequestId,
    params: &Option<Value>,
    registry: &ToolRegistry,
) -> JsonRpcOutput {
    if let Some(p) = params.as_ref().filter(|p| !p.is_null()) {
        if let Err(e) = serde_json::from_value::<ToolsListParams>(p.clone()) {
            return JsonRpcOutput::error(
                id,
                error_codes::INVALID_PARAMS,
                format!("invalid tools/list params: {e}"),
            );
        }
    }

    let definitions: Vec<McpToolDefinition> = registry.iter().map(|t| t.definition()).collect();

    JsonRpcOutput::from_result(
        id,
        ToolsListResult {
            tools: definitions,
            next_cursor: None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_registry_lists_nothing() {
        let out = handle_tools_list(RequestId::Number(1), &None, &ToolRegistry::new());
        let JsonRpcOutput::Success(resp) = out else {
            panic!("expected success");
        };
        assert_eq!(resp.result["tools"], json!([]));
        assert!(resp.result.get("nextCursor").is_none());
    }

    #[test]
    fn bad_params_rejected() {
        let out = handle_tools_list(
            RequestId::Number(2),
            &Some(json!({"cursor": 7})),
            &ToolRegistry::new(),
        );
        assert!(out.is_error());
    }
}
