//! `random` tool.

use async_trait::async_trait;
use rand::{Rng, RngCore};
use serde::Deserialize;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::{ArgType, ToolArgument};

/// Largest byte count accepted for `type: "string"`.
const MAX_STRING_BYTES: f64 = 4096.0;

/// Generates UUIDs, random hex strings or random numbers.
pub struct RandomTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RandomKind {
    Uuid,
    String,
    Number,
}

#[derive(Debug, Deserialize)]
struct RandomArgs {
    #[serde(rename = "type")]
    kind: RandomKind,
    length: u64,
    min: f64,
    max: f64,
}

#[async_trait]
impl ToolHandler for RandomTool {
    fn name(&self) -> &str {
        "random"
    }

    fn title(&self) -> &str {
        "Randomizer Tool"
    }

    fn description(&self) -> &str {
        "Generates random data such as UUIDs, strings, or numbers."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ToolArgument::string("type", "The type of random data to generate.")
                .one_of(&["uuid", "string", "number"])
                .with_default("uuid"),
            ToolArgument::new(
                "length",
                ArgType::Integer,
                "The length of the random string (only for type 'string').",
            )
            .with_default(16)
            .range(Some(0.0), Some(MAX_STRING_BYTES)),
            ToolArgument::number(
                "min",
                "The minimum value for the random number (only for type 'number').",
            )
            .with_default(0),
            ToolArgument::number(
                "max",
                "The maximum value for the random number (only for type 'number').",
            )
            .with_default(1),
        ])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let args: RandomArgs = args
            .parse()
            .map_err(|e| ToolError::invalid(e.to_string()))?;
        let mut rng = rand::thread_rng();

        let result = match args.kind {
            RandomKind::Uuid => uuid::Uuid::new_v4().to_string(),
            RandomKind::String => {
                let mut bytes = vec![0u8; args.length as usize];
                rng.fill_bytes(&mut bytes);
                hex::encode(bytes)
            }
            // Half-open interval [min, max).
            RandomKind::Number => (rng.gen::<f64>() * (args.max - args.min) + args.min).to_string(),
        };

        Ok(ToolsCallResult::text(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    async fn run(args: Value) -> String {
        let args = RandomTool.input_schema().validate(&args).expect("valid");
        RandomTool.call(args).await.expect("call").joined_text()
    }

    #[tokio::test]
    async fn defaults_to_uuid() {
        let out = run(json!({})).await;
        assert!(uuid::Uuid::parse_str(&out).is_ok());
    }

    #[tokio::test]
    async fn string_is_hex_of_requested_length() {
        let out = run(json!({"type": "string", "length": 8})).await;
        assert_eq!(out.len(), 16);
        assert!(out.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn whole_float_length_is_accepted() {
        let out = run(json!({"type": "string", "length": 8.0})).await;
        assert_eq!(out.len(), 16);
    }

    #[tokio::test]
    async fn number_within_bounds() {
        for _ in 0..50 {
            let out = run(json!({"type": "number", "min": 10, "max": 20})).await;
            let n: f64 = out.parse().expect("number");
            assert!((10.0..20.0).contains(&n), "{n} out of range");
        }
    }

    #[test]
    fn unknown_type_rejected_by_schema() {
        assert!(RandomTool
            .input_schema()
            .validate(&json!({"type": "color"}))
            .is_err());
    }

    #[test]
    fn oversized_length_rejected_by_schema() {
        assert!(RandomTool
            .input_schema()
            .validate(&json!({"type": "string", "length": 1_000_000}))
            .is_err());
    }
}
