//! MCP tools/* method types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request params for `tools/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsListParams {
    /// Optional cursor for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A single tool definition in the MCP response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDefinition {
    /// Tool name.
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tool description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Response for `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    /// Available tools.
    pub tools: Vec<McpToolDefinition>,
    /// Pagination cursor for next page.
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Request params for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallParams {
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments to pass.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text { text: String },
}

/// Response for `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallResult {
    /// Content items returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(default, rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolsCallResult {
    /// A successful result carrying a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// A failed result carrying a single human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Concatenates all text items, for logging and CLI output.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_definition_uses_input_schema_key() {
        let def = McpToolDefinition {
            name: "echo".into(),
            title: Some("Echo Tool".into()),
            description: Some("A tool".into()),
            input_schema: json!({"type": "object"}),
        };
        let s = serde_json::to_string(&def).expect("ser");
        assert!(s.contains("inputSchema"));
        assert!(s.contains("\"title\":\"Echo Tool\""));
    }

    #[test]
    fn tools_call_params_defaults_arguments_to_null() {
        let p: ToolsCallParams = serde_json::from_str(r#"{"name":"system_info"}"#).expect("de");
        assert_eq!(p.name, "system_info");
        assert!(p.arguments.is_null());
    }

    #[test]
    fn text_result_matches_wire_shape() {
        let value = serde_json::to_value(ToolsCallResult::text("hi")).expect("ser");
        assert_eq!(value, json!({"content": [{"type": "text", "text": "hi"}]}));
    }

    #[test]
    fn error_result_sets_is_error() {
        let value = serde_json::to_value(ToolsCallResult::error("Error: boom")).expect("ser");
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "Error: boom");
    }

    #[test]
    fn joined_text_concatenates_items() {
        let r = ToolsCallResult {
            content: vec![
                ToolContent::Text { text: "a".into() },
                ToolContent::Text { text: "b".into() },
            ],
            is_error: false,
        };
        assert_eq!(r.joined_text(), "a\nb");
    }
}
