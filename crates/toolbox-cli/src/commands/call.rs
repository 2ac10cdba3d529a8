//! `toolbox call` command.
//!
//! Runs one tool through the same dispatch path the server uses
//! (lookup, argument validation, isolated execution) without a network
//! listener.

use clap::Args;
use serde_json::Value;

use toolbox_config::ToolboxConfig;
use toolbox_types::{ErrorKind, ToolboxError};

use crate::{output, shared};

/// Invoke a single tool locally.
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Tool name (e.g. `echo`, `calculator`).
    pub tool: String,
    /// JSON object of tool arguments.
    #[arg(short, long, default_value = "{}")]
    pub args: String,
}

/// Parses `--args` into a JSON value.
fn parse_arguments(raw: &str) -> anyhow::Result<Value> {
    serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid JSON arguments: {e}"))
}

/// Executes the call command.
///
/// Prints the tool's text on success. A tool-level failure is reported
/// on stderr and returned as a `ToolboxError` so the exit status is
/// non-zero.
pub async fn execute(args: &CallArgs, config: &ToolboxConfig) -> anyhow::Result<()> {
    let arguments = parse_arguments(&args.args)?;
    let handler = shared::build_handler(config)?;

    tracing::debug!(tool = %args.tool, "calling tool");
    match handler.try_call_tool(&args.tool, &arguments).await {
        Ok(result) if !result.is_error => {
            println!("{}", result.joined_text());
            Ok(())
        }
        Ok(result) => {
            output::print_error(&result.joined_text());
            Err(ToolboxError::new(ErrorKind::HandlerFailure, result.joined_text())
                .with_context(format!("tool: {}", args.tool))
                .into())
        }
        Err(e) => {
            output::print_error(&e.message);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_must_be_json() {
        assert!(parse_arguments("{\"text\":\"hi\"}").is_ok());
        let err = parse_arguments("{text").expect_err("not json");
        assert!(err.to_string().starts_with("invalid JSON arguments"));
    }

    #[tokio::test]
    async fn call_succeeds_for_valid_arguments() {
        let args = CallArgs {
            tool: "calculator".into(),
            args: r#"{"expression":"6 * 7"}"#.into(),
        };
        execute(&args, &ToolboxConfig::default())
            .await
            .expect("calculator call");
    }

    #[tokio::test]
    async fn call_fails_for_unknown_tool() {
        let args = CallArgs {
            tool: "nonexistent".into(),
            args: "{}".into(),
        };
        let err = execute(&args, &ToolboxConfig::default())
            .await
            .expect_err("unknown tool");
        let domain = err.downcast_ref::<ToolboxError>().expect("domain error");
        assert_eq!(domain.kind, ErrorKind::UnknownTool);
        assert_eq!(domain.context.as_deref(), Some("tool: nonexistent"));
    }

    #[tokio::test]
    async fn call_fails_for_invalid_arguments() {
        let args = CallArgs {
            tool: "echo".into(),
            args: "{}".into(),
        };
        let err = execute(&args, &ToolboxConfig::default())
            .await
            .expect_err("missing text");
        let domain = err.downcast_ref::<ToolboxError>().expect("domain error");
        assert_eq!(domain.kind, ErrorKind::InvalidArguments);
    }
}
