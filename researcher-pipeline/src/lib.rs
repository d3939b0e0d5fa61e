//! # researcher-pipeline
//!
//! The sequential three-stage keyword research pipeline.
//!
//! A run goes through keyword analysis, search-result analysis, and final
//! recommendation synthesis, in that order, each stage driven by its own
//! persona and fed the previous stage's output. Stage outputs are persisted
//! as timestamped markdown artifacts as the run progresses, and the
//! [`Orchestrator`] shapes the raw results into the fixed three-field
//! [`ResearchOutput`](researcher_core::ResearchOutput).

pub mod artifacts;
pub mod executor;
pub mod orchestrator;
pub mod role;
pub mod stage;
pub mod worker;

pub use artifacts::{ArtifactStore, DEFAULT_OUTPUT_DIR};
pub use executor::PipelineExecutor;
pub use orchestrator::{shape_output, Orchestrator, RUN_TIMESTAMP_FORMAT};
pub use role::{research_roles, ResearchRoles, Role};
pub use stage::{
    build_pipeline, Pipeline, Stage, FINAL_RECOMMENDATIONS, KEYWORD_ANALYSIS, SEARCH_ANALYSIS,
};
pub use worker::{LlmStageWorker, MockStageWorker, StageWorker, MAX_TOOL_TURNS};
