//! Stage workers: the reasoning/tool-use collaborator that turns a stage's
//! description, role, and upstream context into a [`StageResult`].
//!
//! [`LlmStageWorker`] is the production implementation. It runs a bounded
//! multi-turn loop against the chat model: when the model requests tool
//! calls they are executed and fed back as tool messages, and the loop ends
//! on the first plain text answer. There is no retry here; a failed model or
//! tool call surfaces immediately.

use crate::stage::Stage;
use async_trait::async_trait;
use researcher_core::{
    ChatMessage, ChatModel, ChatRequest, GenerationConfig, ResearcherError, Result, StageResult,
    Toolset,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Maximum reasoning turns per stage before the worker gives up.
pub const MAX_TOOL_TURNS: usize = 8;

#[async_trait]
pub trait StageWorker: Send + Sync {
    async fn execute(&self, stage: &Stage, context: &[StageResult]) -> Result<StageResult>;
}

pub struct LlmStageWorker {
    model: Arc<dyn ChatModel>,
    toolset: Toolset,
    max_turns: usize,
}

impl LlmStageWorker {
    pub fn new(model: Arc<dyn ChatModel>, toolset: Toolset) -> Self {
        Self { model, toolset, max_turns: MAX_TOOL_TURNS }
    }

    #[must_use]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    fn system_prompt(stage: &Stage) -> String {
        format!(
            "You are {name}.\nGoal: {goal}\nBackstory: {backstory}",
            name = stage.role.name,
            goal = stage.role.goal,
            backstory = stage.role.backstory,
        )
    }

    fn user_prompt(stage: &Stage, context: &[StageResult]) -> String {
        let mut prompt = stage.description.clone();
        if !context.is_empty() {
            prompt.push_str("\n\nOutput of the previous stage:\n");
            for result in context {
                prompt.push_str(&format!("\n--- {} ---\n{}\n", result.stage, result.content));
            }
        }
        prompt
    }
}

#[async_trait]
impl StageWorker for LlmStageWorker {
    async fn execute(&self, stage: &Stage, context: &[StageResult]) -> Result<StageResult> {
        let declarations = self.toolset.declarations_for(&stage.role.tools);
        let config = GenerationConfig {
            temperature: Some(stage.role.model_config.temperature),
            max_output_tokens: None,
        };

        let mut messages = vec![
            ChatMessage::system(Self::system_prompt(stage)),
            ChatMessage::user(Self::user_prompt(stage, context)),
        ];

        for turn in 0..self.max_turns {
            let request = ChatRequest::new(messages.clone())
                .with_tools(declarations.clone())
                .with_config(config.clone());
            let response = self.model.complete(request).await?;

            if response.has_tool_calls() {
                messages.push(ChatMessage::assistant_tool_calls(
                    response.content.clone().unwrap_or_default(),
                    response.tool_calls.clone(),
                ));
                for call in &response.tool_calls {
                    if !stage.role.tools.iter().any(|t| t == &call.name) {
                        return Err(ResearcherError::Tool(format!(
                            "model requested tool '{}' not permitted for role '{}'",
                            call.name, stage.role.name
                        )));
                    }
                    let tool = self.toolset.get(&call.name).ok_or_else(|| {
                        ResearcherError::Tool(format!("unknown tool '{}'", call.name))
                    })?;

                    tracing::debug!(stage = %stage.id, tool = %call.name, turn, "executing tool call");
                    let result = tool.execute(call.arguments.clone()).await?;
                    messages.push(ChatMessage::tool_result(&call.id, result.to_string()));
                }
                continue;
            }

            match response.content {
                Some(content) => return Ok(StageResult::new(&stage.id, content)),
                None => {
                    return Err(ResearcherError::Model(
                        "model returned neither content nor tool calls".to_string(),
                    ));
                }
            }
        }

        Err(ResearcherError::Stage(format!(
            "stage '{}' exceeded {} reasoning turns without a final answer",
            stage.id, self.max_turns
        )))
    }
}

/// One recorded worker invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub stage: String,
    pub context: Vec<StageResult>,
}

/// Scripted worker for tests: canned outputs per stage, optional scripted
/// failure, full call recording.
#[derive(Default)]
pub struct MockStageWorker {
    outputs: HashMap<String, String>,
    fail_on: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockStageWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, stage: impl Into<String>, content: impl Into<String>) -> Self {
        self.outputs.insert(stage.into(), content.into());
        self
    }

    /// Make the named stage fail with a stage execution error.
    pub fn failing_on(mut self, stage: impl Into<String>) -> Self {
        self.fail_on = Some(stage.into());
        self
    }

    /// All invocations seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageWorker for MockStageWorker {
    async fn execute(&self, stage: &Stage, context: &[StageResult]) -> Result<StageResult> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { stage: stage.id.clone(), context: context.to_vec() });

        if self.fail_on.as_deref() == Some(stage.id.as_str()) {
            return Err(ResearcherError::Stage(format!("scripted failure in '{}'", stage.id)));
        }

        let content = self
            .outputs
            .get(&stage.id)
            .cloned()
            .unwrap_or_else(|| format!("{} output", stage.id));
        Ok(StageResult::new(&stage.id, content))
    }
}
