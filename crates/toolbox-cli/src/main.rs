//! toolbox CLI - MCP utility tool server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod output;
pub(crate) mod shared;

/// toolbox - utility tools for AI agents over MCP.
#[derive(Debug, Parser)]
#[command(name = "toolbox", version, about)]
struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv). Overrides `logging.level`.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format: plain (default) or json (for log aggregation).
    #[arg(long, global = true, default_value = "plain", value_parser = ["plain", "json"])]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the MCP server over SSE.
    Serve(commands::serve::ServeArgs),
    /// List the built-in tools.
    Tools(commands::tools::ToolsArgs),
    /// Invoke one tool locally and print its result.
    Call(commands::call::CallArgs),
}

/// Picks the log filter: `-v` flags win over the configured level.
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shared::load(cli.config.as_deref())?;

    let filter = log_filter(cli.verbose, &config.logging.level);
    match cli.log_format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    };

    tracing::debug!("toolbox starting with config: {:?}", cli.config);

    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Tools(args) => commands::tools::execute(args, &config),
        Commands::Call(args) => commands::call::execute(args, &config).await,
    }
}
