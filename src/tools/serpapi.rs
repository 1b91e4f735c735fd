//! Google search through SerpApi

use crate::error::StudioError;
use crate::models::{ToolInput, ToolOutput};
use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::Tool;

const SERPAPI_URL: &str = "https://serpapi.com/search.json";
const DEFAULT_RESULTS: usize = 5;
const MAX_RESULTS: usize = 10;

pub struct SerpApiSearchTool {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SerpApiSearchTool {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: SERPAPI_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    num_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

fn parse_args(input: &ToolInput) -> Result<(String, usize)> {
    let args: SearchArgs = serde_json::from_value(input.parameters.clone())
        .map_err(|e| StudioError::InvalidToolInput(format!("search_google: {}", e)))?;

    let query = args.query.trim().to_string();
    if query.is_empty() {
        return Err(StudioError::InvalidToolInput(
            "search_google: query must not be empty".to_string(),
        ));
    }

    let limit = args.num_results.unwrap_or(DEFAULT_RESULTS).clamp(1, MAX_RESULTS);
    Ok((query, limit))
}

fn summarize(query: &str, response: SerpResponse, limit: usize) -> Value {
    let results: Vec<OrganicResult> = response.organic_results.into_iter().take(limit).collect();
    json!({
        "query": query,
        "results": results,
    })
}

#[async_trait::async_trait]
impl Tool for SerpApiSearchTool {
    fn name(&self) -> &'static str {
        "search_google"
    }

    fn description(&self) -> &'static str {
        "Search Google for recent information, e.g. an actor's current projects and availability"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (1-10, default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let (query, limit) = parse_args(input)?;
        debug!(query = %query, limit, "search_google");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", query.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StudioError::ToolError(format!("SerpApi request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StudioError::ToolError(format!("SerpApi read failed: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "SerpApi returned an error");
            let message = serde_json::from_str::<SerpResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or(text);
            return Err(StudioError::ToolError(format!(
                "SerpApi returned {}: {}",
                status, message
            )));
        }

        let body: SerpResponse = serde_json::from_str(&text)
            .map_err(|e| StudioError::ToolError(format!("Invalid SerpApi response: {}", e)))?;

        // SerpApi reports bad keys and exhausted plans with a 200 and an `error` field.
        if let Some(message) = body.error {
            warn!(error = %message, "SerpApi search failed");
            return Err(StudioError::ToolError(format!("SerpApi error: {}", message)));
        }

        Ok(ToolOutput {
            success: true,
            data: summarize(&query, body, limit),
            error: None,
        })
    }
}
