//! `web_fetch` tool.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

use crate::html;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Deserialize)]
struct WebFetchArgs {
    url: String,
    format: OutputFormat,
}

/// Fetches a URL and converts the page to text, Markdown, or a JSON summary.
pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    /// Creates the tool around a shared HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<String, ToolError> {
        debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(format!(
                "Failed to fetch URL with status {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ToolError::upstream(e.to_string()))
    }
}

#[async_trait]
impl ToolHandler for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn title(&self) -> &str {
        "Web Fetch Tool"
    }

    fn description(&self) -> &str {
        "Fetches content from a specified URL and converts it to a specified format."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ToolArgument::string("url", "The URL to fetch content from.")
                .url()
                .required(),
            ToolArgument::string("format", "The desired output format.")
                .one_of(&["text", "markdown", "json"])
                .with_default("text"),
        ])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let args: WebFetchArgs = args
            .parse()
            .map_err(|e| ToolError::invalid(e.to_string()))?;
        let page = self.fetch(&args.url).await?;

        let text = match args.format {
            OutputFormat::Text => html::html_to_text(&page),
            OutputFormat::Markdown => html::html_to_markdown(&page),
            OutputFormat::Json => serde_json::to_string_pretty(&html::page_summary(&page))
                .map_err(|e| ToolError::invalid(e.to_string()))?,
        };
        Ok(ToolsCallResult::text(text))
    }
}
