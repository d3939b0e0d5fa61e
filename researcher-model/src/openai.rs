//! OpenAI-compatible chat completions client.
//!
//! Speaks the standard chat completions REST API with `Authorization: Bearer`
//! authentication. Requests are non-streaming: the pipeline consumes whole
//! stage outputs, so there is nothing to surface incrementally.

use crate::config::{OPENAI_API_BASE, OpenAIConfig};
use async_trait::async_trait;
use researcher_core::{
    ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatRole, ResearcherError, Result,
    ToolCall, Usage,
};
use reqwest::Client;
use serde_json::Value;

pub struct OpenAIChatModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIChatModel {
    /// Create a new client from the given config.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ResearcherError::Model(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        })
    }

    /// Build the chat completions URL for this endpoint.
    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_url = self.api_url();
        let body = build_request_body(&self.model, &request);

        let resp = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ResearcherError::Model(format!("OpenAI API error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(ResearcherError::Model(format!(
                "OpenAI API error, status={status}: {error_text}"
            )));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| ResearcherError::Model(format!("Invalid OpenAI response: {e}")))?;

        let response = parse_response(&payload)?;
        tracing::debug!(
            model = %self.model,
            tool_calls = response.tool_calls.len(),
            "chat completion received"
        );
        Ok(response)
    }
}

/// Build a chat completions request body from a [`ChatRequest`].
pub(crate) fn build_request_body(model: &str, request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(message_to_value).collect();

    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
    });

    if !request.tools.is_empty() {
        let tool_array: Vec<Value> = request
            .tools
            .iter()
            .map(|decl| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": decl.name,
                        "description": decl.description,
                        "parameters": decl.parameters,
                    }
                })
            })
            .collect();
        body["tools"] = Value::Array(tool_array);
    }

    if let Some(config) = &request.config {
        if let Some(temp) = config.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = config.max_output_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
    }

    body
}

/// Convert a single [`ChatMessage`] to a chat completions message object.
fn message_to_value(message: &ChatMessage) -> Value {
    match message.role {
        ChatRole::System => serde_json::json!({
            "role": "system",
            "content": message.content,
        }),
        ChatRole::User => serde_json::json!({
            "role": "user",
            "content": message.content,
        }),
        ChatRole::Assistant => {
            let mut msg = serde_json::json!({ "role": "assistant" });
            if !message.content.is_empty() {
                msg["content"] = Value::String(message.content.clone());
            }
            if !message.tool_calls.is_empty() {
                let calls: Vec<Value> = message
                    .tool_calls
                    .iter()
                    .map(|call| {
                        serde_json::json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
                msg["tool_calls"] = Value::Array(calls);
            }
            // Assistant messages need either content or tool_calls.
            if msg.get("content").is_none() && msg.get("tool_calls").is_none() {
                msg["content"] = Value::String(" ".to_string());
            }
            msg
        }
        ChatRole::Tool => serde_json::json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id.clone().unwrap_or_else(|| "unknown".to_string()),
            "content": message.content,
        }),
    }
}

/// Parse a chat completions response payload into a [`ChatResponse`].
pub(crate) fn parse_response(payload: &Value) -> Result<ChatResponse> {
    let message = payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| {
            ResearcherError::Model(format!("OpenAI response has no choices: {payload}"))
        })?;

    let content = message
        .get("content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let tool_calls = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| calls.iter().filter_map(parse_tool_call).collect())
        .unwrap_or_default();

    let usage = payload.get("usage").and_then(|u| {
        Some(Usage {
            prompt_tokens: u.get("prompt_tokens")?.as_u64()? as u32,
            completion_tokens: u.get("completion_tokens")?.as_u64()? as u32,
            total_tokens: u.get("total_tokens")?.as_u64()? as u32,
        })
    });

    Ok(ChatResponse { content, tool_calls, usage })
}

fn parse_tool_call(call: &Value) -> Option<ToolCall> {
    let function = call.get("function")?;
    let arguments = match function.get("arguments") {
        // Arguments arrive as a JSON-encoded string; tolerate plain objects too.
        Some(Value::String(s)) => serde_json::from_str(s).unwrap_or(Value::Null),
        Some(other) => other.clone(),
        None => Value::Null,
    };
    Some(ToolCall {
        id: call.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        name: function.get("name").and_then(Value::as_str)?.to_string(),
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use researcher_core::{GenerationConfig, ToolDeclaration};
    use serde_json::json;

    fn search_declaration() -> ToolDeclaration {
        ToolDeclaration {
            name: "web_search".to_string(),
            description: "Search the web".to_string(),
            parameters: json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a keyword researcher"),
            ChatMessage::user("Analyze: rust async"),
        ]);
        let body = build_request_body("gpt-4o", &request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Analyze: rust async");
        assert!(body.get("tools").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_build_request_body_with_tools_and_config() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_tools(vec![search_declaration()])
            .with_config(GenerationConfig { temperature: Some(0.7), max_output_tokens: Some(1024) });
        let body = build_request_body("gpt-4o", &request);

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "web_search");
        assert_eq!(body["temperature"], json!(0.7));
        assert_eq!(body["max_tokens"], json!(1024));
    }

    #[test]
    fn test_tool_messages_roundtrip_into_body() {
        let call = ToolCall {
            id: "call-1".to_string(),
            name: "web_search".to_string(),
            arguments: json!({"query": "rust"}),
        };
        let request = ChatRequest::new(vec![
            ChatMessage::assistant_tool_calls("", vec![call]),
            ChatMessage::tool_result("call-1", "{\"results\":[]}"),
        ]);
        let body = build_request_body("gpt-4o", &request);

        assert_eq!(body["messages"][0]["tool_calls"][0]["id"], "call-1");
        assert_eq!(
            body["messages"][0]["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"rust\"}"
        );
        assert_eq!(body["messages"][1]["role"], "tool");
        assert_eq!(body["messages"][1]["tool_call_id"], "call-1");
    }

    #[test]
    fn test_parse_text_response() {
        let payload = json!({
            "choices": [{ "message": { "role": "assistant", "content": "## Keywords" } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        });
        let response = parse_response(&payload).unwrap();

        assert_eq!(response.content.as_deref(), Some("## Keywords"));
        assert!(!response.has_tool_calls());
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_parse_tool_call_response() {
        let payload = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call-1",
                        "type": "function",
                        "function": {
                            "name": "web_search",
                            "arguments": "{\"query\": \"rust keywords\"}"
                        }
                    }]
                }
            }]
        });
        let response = parse_response(&payload).unwrap();

        assert!(response.content.is_none());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "web_search");
        assert_eq!(response.tool_calls[0].arguments["query"], "rust keywords");
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        let err = parse_response(&json!({ "error": { "message": "rate limited" } })).unwrap_err();
        assert!(matches!(err, ResearcherError::Model(_)));
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let model = OpenAIChatModel::new(
            OpenAIConfig::new("key", "gpt-4o").with_base_url("https://example.com/v1/"),
        )
        .unwrap();
        assert_eq!(model.api_url(), "https://example.com/v1/chat/completions");
    }
}
