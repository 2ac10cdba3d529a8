//! `web_search` tool backed by Google Custom Search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use toolbox_protocol::mcp::tools::ToolsCallResult;
use toolbox_protocol::{InputSchema, ValidatedArgs};
use toolbox_registry::{ToolError, ToolHandler};
use toolbox_types::ToolArgument;

use crate::ToolsConfig;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
    format: OutputFormat,
}

/// Response body of the Custom Search API. Only the fields we forward.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Google Custom Search credentials.
#[derive(Debug, Clone)]
struct Credentials {
    api_key: String,
    cx: String,
}

/// Runs a web search and returns `{title, link, snippet}` results.
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
    credentials: Option<Credentials>,
}

impl WebSearchTool {
    /// Creates the tool. Without both an API key and an engine id every
    /// call reports that search is not configured.
    pub fn new(client: reqwest::Client, config: &ToolsConfig) -> Self {
        let credentials = match (&config.google_api_key, &config.google_cx) {
            (Some(api_key), Some(cx)) if !api_key.is_empty() && !cx.is_empty() => {
                Some(Credentials {
                    api_key: api_key.clone(),
                    cx: cx.clone(),
                })
            }
            _ => None,
        };
        Self {
            client,
            endpoint: config.search_endpoint.clone(),
            credentials,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchItem>, ToolError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ToolError::NotConfigured(
                "Google API key or Custom Search Engine ID is not configured.".to_string(),
            )
        })?;

        debug!(query, "running web search");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", credentials.api_key.as_str()),
                ("cx", credentials.cx.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(|e| ToolError::upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::upstream(format!(
                "Failed to fetch search results with status {}",
                status.as_u16()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::upstream(e.to_string()))?;
        Ok(body.items)
    }
}

fn render_markdown(items: &[SearchItem]) -> String {
    items
        .iter()
        .map(|item| format!("### [{}]({})\n{}", item.title, item.link, item.snippet))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn title(&self) -> &str {
        "Web Search Tool"
    }

    fn description(&self) -> &str {
        "Performs a web search using Google Custom Search."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new(vec![
            ToolArgument::string("query", "The search query.").required(),
            ToolArgument::string("format", "The desired output format.")
                .one_of(&["json", "markdown"])
                .with_default("json"),
        ])
    }

    async fn call(&self, args: ValidatedArgs) -> Result<ToolsCallResult, ToolError> {
        let args: WebSearchArgs = args
            .parse()
            .map_err(|e| ToolError::invalid(e.to_string()))?;
        let items = self.search(&args.query).await?;

        let text = match args.format {
            OutputFormat::Markdown => render_markdown(&items),
            OutputFormat::Json => serde_json::to_string_pretty(&items)
                .map_err(|e| ToolError::invalid(e.to_string()))?,
        };
        Ok(ToolsCallResult::text(text))
    }
}
