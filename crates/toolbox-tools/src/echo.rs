//! `echo` tool.

use async_trait::async_trait;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

/// Returns the text it was given.
pub struct EchoTool;

#[async_trait]
impl ToolHandler for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn title(&self) -> &str {
        "Echo Tool"
    }

    fn description(&self) -> &str {
        "A simple tool that returns the text it was given."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ToolArgument::string("text", "The text to echo back.").required()
        ])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let text = args
            .get_str("text")
            .ok_or_else(|| ToolError::invalid("text is required"))?;
        Ok(ToolsCallResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn echoes_text() {
        let args = EchoTool
            .input_schema()
            .validate(&json!({"text": "hi"}))
            .expect("valid");
        let out = EchoTool.call(args).await.expect("call");
        assert_eq!(out.joined_text(), "hi");
        assert!(!out.is_error);
    }

    #[test]
    fn text_is_required() {
        assert!(EchoTool.input_schema().validate(&json!({})).is_err());
    }
}
