//! MCP request handler: routes JSON-RPC methods to dispatch functions.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use toolbox_protocol::mcp::methods;
use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{
    error_codes, IncomingMessage, JsonRpcErrorResponse, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, RequestId,
};
use toolbox_registry::ToolRegistry;
use toolbox_types::ToolboxError;

use crate::dispatch;

/// Server name advertised in the `initialize` handshake.
pub const SERVER_NAME: &str = "toolbox-mcp-server";

/// A JSON-RPC response ready to be written to a transport.
#[derive(Debug, Clone)]
pub enum JsonRpcOutput {
    /// Successful result.
    Success(JsonRpcResponse),
    /// Protocol-level error.
    Error(JsonRpcErrorResponse),
}

impl JsonRpcOutput {
    /// Builds an error output.
    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Self::Error(JsonRpcErrorResponse::error(id, code, message))
    }

    /// Serializes a result value, falling back to an internal error.
    pub(crate) fn from_result<T: serde::Serialize>(id: RequestId, result: T) -> Self {
        match serde_json::to_value(result) {
            Ok(v) => Self::Success(JsonRpcResponse::success(id, v)),
            Err(e) => Self::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    /// The id of the request this output answers.
    pub fn id(&self) -> &RequestId {
        match self {
            Self::Success(r) => &r.id,
            Self::Error(r) => &r.id,
        }
    }

    /// Whether this is a protocol-level error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Serializes the output to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns the serde error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Success(r) => serde_json::to_string(r),
            Self::Error(r) => serde_json::to_string(r),
        }
    }
}

/// Dispatches MCP requests against a tool registry.
///
/// Cheap to clone; the registry is shared read-only between sessions.
#[derive(Debug, Clone)]
pub struct McpHandler {
    registry: Arc<ToolRegistry>,
}

impl McpHandler {
    /// Creates a handler over the given registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this handler dispatches to.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles any inbound message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: IncomingMessage) -> Option<JsonRpcOutput> {
        match message {
            IncomingMessage::Request(request) => Some(self.dispatch(&request).await),
            IncomingMessage::Notification(notification) => {
                self.handle_notification(&notification);
                None
            }
        }
    }

    /// Dispatches a request to its method implementation.
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcOutput {
        let id = request.id.clone();
        debug!(method = %request.method, id = ?id, "dispatching request");

        match request.method.as_str() {
            methods::INITIALIZE => dispatch::initialize::handle_initialize(id, &request.params),
            methods::PING => JsonRpcOutput::Success(JsonRpcResponse::success(
                id,
                Value::Object(serde_json::Map::new()),
            )),
            methods::TOOLS_LIST => {
                dispatch::tools_list::handle_tools_list(id, &request.params, &self.registry)
            }
            methods::TOOLS_CALL => {
                dispatch::tools_call::handle_tools_call(id, &request.params, &self.registry).await
            }
            other => {
                warn!(method = other, "method not found");
                JsonRpcOutput::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {other}"),
                )
            }
        }
    }

    /// Runs a tool by name outside of JSON-RPC framing.
    ///
    /// Failures are folded into an `isError` result, exactly as `tools/call`
    /// reports them.
    pub async fn call_tool(&self, name: &str, arguments: &Value) -> ToolsCallResult {
        dispatch::tools_call::execute(&self.registry, name, arguments)
            .await
            .unwrap_or_else(|failure| failure.into_result())
    }

    /// Runs a tool by name, keeping a dispatch failure as a domain error.
    ///
    /// # Errors
    ///
    /// Returns a `ToolboxError` of kind `UnknownTool`, `InvalidArguments`,
    /// `HandlerFailure` or `Internal` (panic), with the tool name as context.
    pub async fn try_call_tool(
        &self,
        name: &str,
        arguments: &Value,
    ) -> Result<ToolsCallResult, ToolboxError> {
        dispatch::tools_call::execute(&self.registry, name, arguments)
            .await
            .map_err(|failure| ToolboxError::from(failure).with_context(format!("tool: {name}")))
    }

    /// Handles a notification. Notifications never produce a response.
    pub fn handle_notification(&self, notification: &JsonRpcNotification) {
        match notification.method.as_str() {
            methods::NOTIFICATIONS_INITIALIZED => debug!("client initialized"),
            methods::NOTIFICATIONS_CANCELLED => debug!("client cancelled a request"),
            other => debug!(method = other, "ignoring notification"),
        }
    }
}
