//! Web search tool backed by the Serper search API.

use async_trait::async_trait;
use researcher_core::{ResearcherError, Result, Tool};
use reqwest::Client;
use serde_json::Value;

/// Serper API endpoint.
pub const SERPER_API_URL: &str = "https://google.serper.dev/search";

/// Upper bound on results per search, regardless of what the model asks for.
const MAX_RESULTS_CAP: u32 = 10;

/// Performs a web search and returns the organic results.
///
/// The API key is injected at construction; the tool never reads the
/// environment itself.
pub struct WebSearchTool {
    client: Client,
    api_key: String,
    api_url: String,
    max_results: u32,
}

impl WebSearchTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_url: SERPER_API_URL.to_string(),
            max_results: MAX_RESULTS_CAP,
        }
    }

    /// Cap the number of results returned per search.
    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.min(MAX_RESULTS_CAP);
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Performs a web search and returns the most relevant results with title, link and snippet."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to run"
                },
                "num": {
                    "type": "integer",
                    "description": "Number of results to return"
                }
            },
            "required": ["query"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ResearcherError::Tool("web_search requires a query".to_string()))?;

        let num = args
            .get("num")
            .and_then(Value::as_u64)
            .map(|n| (n as u32).min(self.max_results))
            .unwrap_or(self.max_results);

        tracing::debug!(query, num, "running web search");

        let resp = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&build_search_body(query, num))
            .send()
            .await
            .map_err(|e| ResearcherError::Tool(format!("Serper API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(ResearcherError::Tool(format!(
                "Serper API error, status={status}: {error_text}"
            )));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| ResearcherError::Tool(format!("Invalid Serper response: {e}")))?;

        Ok(shape_results(&payload, num))
    }
}

/// Build the Serper request body.
pub(crate) fn build_search_body(query: &str, num: u32) -> Value {
    serde_json::json!({ "q": query, "num": num })
}

/// Reduce a Serper payload to the fields the model needs.
pub(crate) fn shape_results(payload: &Value, num: u32) -> Value {
    let results: Vec<Value> = payload
        .get("organic")
        .and_then(Value::as_array)
        .map(|organic| {
            organic
                .iter()
                .take(num as usize)
                .map(|entry| {
                    serde_json::json!({
                        "title": entry.get("title").and_then(Value::as_str).unwrap_or_default(),
                        "link": entry.get("link").and_then(Value::as_str).unwrap_or_default(),
                        "snippet": entry.get("snippet").and_then(Value::as_str).unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    serde_json::json!({ "results": results })
}
