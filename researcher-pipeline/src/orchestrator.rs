//! Run orchestration: validation, pipeline assembly, execution, and result
//! shaping.
//!
//! The orchestrator is the single entry point for a research run. It
//! validates the raw request and the pipeline's tool requirements before any
//! side effect, stamps the run with one timestamp shared by every artifact,
//! executes the stages sequentially, and shapes the raw stage outputs into
//! the fixed three-field result object.

use crate::artifacts::{ArtifactStore, DEFAULT_OUTPUT_DIR};
use crate::role::research_roles;
use crate::stage::{build_pipeline, FINAL_RECOMMENDATIONS, KEYWORD_ANALYSIS, SEARCH_ANALYSIS};
use crate::worker::StageWorker;
use crate::PipelineExecutor;
use researcher_core::{
    ModelConfig, RequestConfig, ResearchOutput, ResearcherError, Result, RunResults, Toolset,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Timestamp format shared by all artifact file names of one run.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub struct Orchestrator {
    worker: Arc<dyn StageWorker>,
    toolset: Toolset,
    model_config: ModelConfig,
    output_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(worker: Arc<dyn StageWorker>) -> Self {
        Self {
            worker,
            toolset: Toolset::new(),
            model_config: ModelConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// The tools initialized for this run. Every role's permitted tool list
    /// must be a subset of it; the run fails with a `Config` error otherwise.
    #[must_use]
    pub fn with_toolset(mut self, toolset: Toolset) -> Self {
        self.toolset = toolset;
        self
    }

    #[must_use]
    pub fn with_model_config(mut self, model_config: ModelConfig) -> Self {
        self.model_config = model_config;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Run the full pipeline for a raw request payload.
    ///
    /// Validation happens before any artifact directory or file is touched;
    /// an invalid request leaves the filesystem unchanged.
    pub async fn run(&self, request: &Value) -> Result<ResearchOutput> {
        let config = RequestConfig::from_value(request)?;
        self.run_validated(&config).await
    }

    /// Run the pipeline for an already validated request.
    pub async fn run_validated(&self, config: &RequestConfig) -> Result<ResearchOutput> {
        let run_id = uuid::Uuid::new_v4();
        let timestamp = chrono::Local::now().format(RUN_TIMESTAMP_FORMAT).to_string();
        tracing::info!(
            %run_id,
            topic = %config.research_topic.topic,
            depth = config.research_topic.depth.as_str(),
            %timestamp,
            "research run started"
        );

        let roles = research_roles(&self.model_config);
        let pipeline = build_pipeline(config, &roles, &timestamp);
        pipeline.validate(&self.toolset)?;

        let executor =
            PipelineExecutor::new(self.worker.clone(), ArtifactStore::new(&self.output_dir));
        let results = executor.run(&pipeline).await?;

        let output = shape_output(&results);
        tracing::info!(%run_id, "research run complete");
        Ok(output)
    }
}

/// Shape the raw stage results into the fixed three-field output.
///
/// Shaping failures never fail the run. A stage whose content cannot be
/// shaped contributes an empty mapping, and the failure is logged.
pub fn shape_output(results: &RunResults) -> ResearchOutput {
    ResearchOutput {
        keyword_analysis: shape_field(results, KEYWORD_ANALYSIS),
        search_analysis: shape_field(results, SEARCH_ANALYSIS),
        final_recommendations: shape_field(results, FINAL_RECOMMENDATIONS),
    }
}

fn shape_field(results: &RunResults, stage: &str) -> Map<String, Value> {
    match try_shape_field(results, stage) {
        Ok(map) => map,
        Err(e) => {
            tracing::error!(stage, error = %e, "result shaping failed, substituting empty mapping");
            Map::new()
        }
    }
}

fn try_shape_field(results: &RunResults, stage: &str) -> Result<Map<String, Value>> {
    let result = results
        .get(stage)
        .ok_or_else(|| ResearcherError::Shaping(format!("no result recorded for '{stage}'")))?;

    if result.content.trim().is_empty() {
        return Err(ResearcherError::Shaping(format!("stage '{stage}' produced empty content")));
    }

    // JSON-object content passes through as-is; anything else is wrapped so
    // the field is always a mapping.
    if let Some(map) = result.structured() {
        return Ok(map);
    }
    let mut map = Map::new();
    map.insert("stage".to_string(), Value::String(result.stage.clone()));
    map.insert("content".to_string(), Value::String(result.content.clone()));
    Ok(map)
}
