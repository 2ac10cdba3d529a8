//! `calculator` tool.

use async_trait::async_trait;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

use crate::expr;

/// Evaluates an arithmetic expression.
pub struct CalculatorTool;

#[async_trait]
impl ToolHandler for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn title(&self) -> &str {
        "Calculator Tool"
    }

    fn description(&self) -> &str {
        "Evaluates a mathematical expression."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![ToolArgument::string(
            "expression",
            "The mathematical expression to evaluate.",
        )
        .required()])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let expression = args
            .get_str("expression")
            .ok_or_else(|| ToolError::invalid("expression is required"))?;
        let value = expr::evaluate(expression).map_err(|e| ToolError::invalid(e.to_string()))?;
        Ok(ToolsCallResult::text(expr::format_number(value)))
    }
}
