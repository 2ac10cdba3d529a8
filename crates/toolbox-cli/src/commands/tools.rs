//! `toolbox tools` command.

use clap::Args;

use toolbox_config::ToolboxConfig;
use toolbox_mcp::McpHandler;

use crate::{output, shared};

/// List the built-in tools.
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Print the full `tools/list` definitions as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Executes the tools command.
pub fn execute(args: &ToolsArgs, config: &ToolboxConfig) -> anyhow::Result<()> {
    let handler = shared::build_handler(config)?;
    if args.json {
        let definitions: Vec<_> = handler.registry().iter().map(|t| t.definition()).collect();
        println!("{}", serde_json::to_string_pretty(&definitions)?);
    } else {
        for row in rows(&handler) {
            println!("{row}");
        }
    }
    Ok(())
}

/// One aligned `name  description` line per tool, in registration order.
fn rows(handler: &McpHandler) -> Vec<String> {
    let registry = handler.registry();
    let width = registry.iter().map(|t| t.name().len()).max().unwrap_or(0);
    registry
        .iter()
        .map(|t| output::tool_row(t.name(), t.description(), width))
        .collect()
}
