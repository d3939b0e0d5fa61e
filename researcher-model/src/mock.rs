use async_trait::async_trait;
use researcher_core::{ChatModel, ChatRequest, ChatResponse, ResearcherError, Result};
use std::sync::Mutex;

/// Scripted chat model for tests. Pops queued responses in order and records
/// every request it receives.
pub struct MockChatModel {
    name: String,
    responses: Mutex<Vec<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), responses: Mutex::new(vec![]), requests: Mutex::new(vec![]) }
    }

    pub fn with_response(self, response: ChatResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(ChatResponse::text(text))
    }

    /// All requests seen so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(req);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ResearcherError::Model("mock has no responses left".to_string()));
        }
        Ok(responses.remove(0))
    }
}
