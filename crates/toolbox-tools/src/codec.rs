//! `encoder` and `decoder` tools.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

/// Supported encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Standard base64 with padding.
    Base64,
    /// Percent-encoding of everything but unreserved characters.
    Url,
}

impl Format {
    fn from_args(args: &ValidatedArgs) -> Result<Self, ToolError> {
        match args.get_str("format") {
            Some("base64") => Ok(Self::Base64),
            Some("url") => Ok(Self::Url),
            other => Err(ToolError::invalid(format!(
                "unsupported format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

/// Encodes `text` in the given format.
pub fn encode(text: &str, format: Format) -> String {
    match format {
        Format::Base64 => STANDARD.encode(text.as_bytes()),
        Format::Url => urlencoding::encode(text).into_owned(),
    }
}

/// Decodes `text` from the given format.
///
/// # Errors
///
/// Returns `ToolError::InvalidInput` if `text` is not valid in `format`.
pub fn decode(text: &str, format: Format) -> Result<String, ToolError> {
    match format {
        Format::Base64 => {
            let bytes = STANDARD
                .decode(text.trim())
                .map_err(|e| ToolError::invalid(format!("invalid base64 input: {e}")))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Format::Url => urlencoding::decode(text)
            .map(|s| s.into_owned())
            .map_err(|e| ToolError::invalid(format!("URI malformed: {e}"))),
    }
}

fn codec_schema(verb: &str) -> InputSchema {
    InputSchema::new(vec![
        ToolArgument::string("text", format!("The string to {verb}.")).required(),
        ToolArgument::string("format", format!("The {verb}ing format to use."))
            .one_of(&["base64", "url"])
            .required(),
    ])
}

fn text_arg(args: &ValidatedArgs) -> Result<&str, ToolError> {
    args.get_str("text")
        .ok_or_else(|| ToolError::invalid("text is required"))
}

/// Encodes a string as base64 or URL-encoding.
pub struct EncoderTool;

#[async_trait]
impl ToolHandler for EncoderTool {
    fn name(&self) -> &str {
        "encoder"
    }

    fn title(&self) -> &str {
        "Encoder Tool"
    }

    fn description(&self) -> &str {
        "Encodes a string using a specified format (base64 or url)."
    }

    fn input_schema(&self) -> InputSchema {
        codec_schema("encode")
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let format = Format::from_args(&args)?;
        Ok(ToolsCallResult::text(encode(text_arg(&args)?, format)))
    }
}

/// Decodes a base64 or URL-encoded string.
pub struct DecoderTool;

#[async_trait]
impl ToolHandler for DecoderTool {
    fn name(&self) -> &str {
        "decoder"
    }

    fn title(&self) -> &str {
        "Decoder Tool"
    }

    fn description(&self) -> &str {
        "Decodes a string from a specified format (base64 or url)."
    }

    fn input_schema(&self) -> InputSchema {
        codec_schema("decode")
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let format = Format::from_args(&args)?;
        Ok(ToolsCallResult::text(decode(text_arg(&args)?, format)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base64_encoding() {
        assert_eq!(encode("hello world", Format::Base64), "aGVsbG8gd29ybGQ=");
        assert_eq!(
            decode("aGVsbG8gd29ybGQ=", Format::Base64).expect("decode"),
            "hello world"
        );
    }

    #[test]
    fn url_encoding() {
        assert_eq!(encode("a b&c=d/é", Format::Url), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(decode("a%20b%26c", Format::Url).expect("decode"), "a b&c");
    }

    #[test]
    fn invalid_base64_is_error() {
        let err = decode("***", Format::Base64).expect_err("invalid");
        assert!(err.to_string().starts_with("invalid base64 input"));
    }

    #[test]
    fn malformed_percent_sequence_is_error() {
        assert!(decode("%E0%A4%A", Format::Url).is_err());
    }

    #[tokio::test]
    async fn encoder_tool_round_trip_through_decoder_tool() {
        let args = EncoderTool
            .input_schema()
            .validate(&json!({"text": "toolbox", "format": "base64"}))
            .expect("valid");
        let encoded = EncoderTool.call(args).await.expect("encode").joined_text();

        let args = DecoderTool
            .input_schema()
            .validate(&json!({"text": encoded, "format": "base64"}))
            .expect("valid");
        let decoded = DecoderTool.call(args).await.expect("decode").joined_text();
        assert_eq!(decoded, "toolbox");
    }

    #[test]
    fn schema_rejects_unknown_format() {
        assert!(DecoderTool
            .input_schema()
            .validate(&json!({"text": "x", "format": "hex"}))
            .is_err());
    }
}
