//! `time` tool.

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

/// Reports the current time in an IANA timezone.
pub struct TimeTool;

/// Formats the current instant in `tz`, e.g. `10/18/2026, 2:03:04 PM EDT (America/New_York)`.
fn format_now(tz: Tz) -> String {
    let now = Utc::now().with_timezone(&tz);
    format!("{} ({})", now.format("%-m/%-d/%Y, %-I:%M:%S %p %Z"), tz.name())
}

#[async_trait]
impl ToolHandler for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn title(&self) -> &str {
        "Time Tool"
    }

    fn description(&self) -> &str {
        "Returns the current server time, optionally in a specific timezone."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![ToolArgument::string(
            "timezone",
            "An optional IANA timezone name (e.g., 'America/New_York'). Defaults to UTC.",
        )])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let name = args
            .get_str("timezone")
            .filter(|s| !s.is_empty())
            .unwrap_or("UTC");
        let tz: Tz = name
            .parse()
            .map_err(|_| ToolError::invalid(format!("Invalid timezone '{name}'")))?;
        Ok(ToolsCallResult::text(format_now(tz)))
    }
}
