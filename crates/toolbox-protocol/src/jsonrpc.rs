//! JSON-RPC 2.0 types for MCP transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID.
    pub id: RequestId,
    /// Method name.
    pub method: String,
    /// Optional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID (matches the request).
    pub id: RequestId,
    /// Result value.
    pub result: Value,
}

/// JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID (matches the request).
    pub id: RequestId,
    /// Error details.
    pub error: JsonRpcError,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Request ID can be a number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric ID.
    Number(i64),
    /// String ID.
    String(String),
}

/// JSON-RPC 2.0 notification (no id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Optional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Standard JSON-RPC error codes.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC 2.0 request.
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcResponse {
    /// Creates a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcErrorResponse {
    /// Creates an error response.
    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            error: JsonRpcError {
                code,
                message: message.into(),
                data: None,
            },
        }
    }
}

/// Why an inbound message body could not be decoded.
#[derive(Debug, Error)]
pub enum MessageParseError {
    /// The body is not valid JSON.
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// The body is JSON but not a JSON-RPC request or notification.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A message received from a client.
///
/// Messages with a non-null `id` are requests and expect a response;
/// messages without one are notifications and must not be answered.
#[derive(Debug, Clone)]
pub enum IncomingMessage {
    /// A request expecting a response.
    Request(JsonRpcRequest),
    /// A fire-and-forget notification.
    Notification(JsonRpcNotification),
}

impl IncomingMessage {
    /// Decodes a message body.
    ///
    /// # Errors
    ///
    /// Returns `MessageParseError::Json` for malformed JSON and
    /// `MessageParseError::InvalidRequest` when required fields are missing.
    pub fn parse(body: &str) -> Result<Self, MessageParseError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Classifies an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `MessageParseError::InvalidRequest` when the value is not a
    /// JSON-RPC request or notification.
    pub fn from_value(value: Value) -> Result<Self, MessageParseError> {
        if !value.is_object() {
            return Err(MessageParseError::InvalidRequest(
                "message must be a JSON object".to_string(),
            ));
        }

        let has_id = value.get("id").is_some_and(|v| !v.is_null());
        if has_id {
            serde_json::from_value::<JsonRpcRequest>(value)
                .map(Self::Request)
                .map_err(|e| MessageParseError::InvalidRequest(e.to_string()))
        } else {
            serde_json::from_value::<JsonRpcNotification>(value)
                .map(Self::Notification)
                .map_err(|e| MessageParseError::InvalidRequest(e.to_string()))
        }
    }

    /// Returns the method name.
    pub fn method(&self) -> &str {
        match self {
            Self::Request(r) => &r.method,
            Self::Notification(n) => &n.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_with_id() {
        let msg = IncomingMessage::parse(r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#)
            .expect("parse");
        match msg {
            IncomingMessage::Request(r) => assert_eq!(r.id, RequestId::Number(7)),
            IncomingMessage::Notification(_) => panic!("expected request"),
        }
    }

    #[test]
    fn parse_notification_without_id() {
        let msg =
            IncomingMessage::parse(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .expect("parse");
        assert!(matches!(msg, IncomingMessage::Notification(_)));
        assert_eq!(msg.method(), "notifications/initialized");
    }

    #[test]
    fn null_id_is_a_notification() {
        let msg = IncomingMessage::parse(r#"{"jsonrpc":"2.0","id":null,"method":"x"}"#)
            .expect("parse");
        assert!(matches!(msg, IncomingMessage::Notification(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = IncomingMessage::parse("not json").expect_err("should fail");
        assert!(matches!(err, MessageParseError::Json(_)));
        assert!(err.to_string().starts_with("Parse error"));
    }

    #[test]
    fn missing_method_is_invalid_request() {
        let err = IncomingMessage::parse(r#"{"jsonrpc":"2.0","id":1}"#).expect_err("should fail");
        assert!(matches!(err, MessageParseError::InvalidRequest(_)));
    }

    #[test]
    fn array_body_is_invalid_request() {
        let err = IncomingMessage::parse("[1,2]").expect_err("should fail");
        assert!(err.to_string().contains("JSON object"));
    }
}
