//! Strictly sequential pipeline execution.
//!
//! Stages run one at a time in declared order. A stage starts only after its
//! predecessor has finished, had its artifact persisted, and had its result
//! recorded. The first stage failure aborts the run; later stages never start
//! and no later artifacts are written.

use crate::artifacts::ArtifactStore;
use crate::stage::Pipeline;
use crate::worker::StageWorker;
use researcher_core::{ResearcherError, Result, RunResults, StageResult};
use std::sync::Arc;

pub struct PipelineExecutor {
    worker: Arc<dyn StageWorker>,
    artifacts: ArtifactStore,
}

impl PipelineExecutor {
    pub fn new(worker: Arc<dyn StageWorker>, artifacts: ArtifactStore) -> Self {
        Self { worker, artifacts }
    }

    /// Run every stage in order, returning all results on success.
    pub async fn run(&self, pipeline: &Pipeline) -> Result<RunResults> {
        let mut results = RunResults::new();

        for stage in pipeline.stages() {
            tracing::info!(stage = %stage.id, role = %stage.role.name, "stage started");

            let context = self.upstream_context(stage, &results)?;
            let result = self
                .worker
                .execute(stage, &context)
                .await
                .map_err(|e| ResearcherError::Stage(format!("stage '{}' failed: {e}", stage.id)))?;

            // Persist before recording so a crash between stages never loses
            // a completed stage's output.
            self.artifacts.save(&stage.artifact_file, &result.content).await?;
            tracing::info!(stage = %stage.id, artifact = %stage.artifact_file, "stage complete");
            results.push(result);
        }

        Ok(results)
    }

    fn upstream_context(
        &self,
        stage: &crate::stage::Stage,
        results: &RunResults,
    ) -> Result<Vec<StageResult>> {
        let mut context = Vec::with_capacity(stage.upstream.len());
        for upstream in &stage.upstream {
            let result = results.get(upstream).ok_or_else(|| {
                ResearcherError::Stage(format!(
                    "stage '{}' requires output of '{upstream}' which has not run",
                    stage.id
                ))
            })?;
            context.push(result.clone());
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::research_roles;
    use crate::stage::{build_pipeline, FINAL_RECOMMENDATIONS, KEYWORD_ANALYSIS, SEARCH_ANALYSIS};
    use crate::worker::MockStageWorker;
    use researcher_core::{ModelConfig, RequestConfig, ResearchTopic};

    fn pipeline() -> Pipeline {
        let request = RequestConfig::new(ResearchTopic::new("rust async"));
        let roles = research_roles(&ModelConfig::default());
        build_pipeline(&request, &roles, "20260828_120000")
    }

    #[tokio::test]
    async fn test_stages_run_in_declared_order() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Arc::new(MockStageWorker::new());
        let executor = PipelineExecutor::new(worker.clone(), ArtifactStore::new(dir.path()));

        let results = executor.run(&pipeline()).await.unwrap();

        assert_eq!(results.len(), 3);
        let order: Vec<String> = worker.calls().iter().map(|c| c.stage.clone()).collect();
        assert_eq!(order, vec![KEYWORD_ANALYSIS, SEARCH_ANALYSIS, FINAL_RECOMMENDATIONS]);
    }

    #[tokio::test]
    async fn test_each_stage_sees_only_its_predecessor() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Arc::new(
            MockStageWorker::new()
                .with_output(KEYWORD_ANALYSIS, "keywords here")
                .with_output(SEARCH_ANALYSIS, "analysis here"),
        );
        let executor = PipelineExecutor::new(worker.clone(), ArtifactStore::new(dir.path()));

        executor.run(&pipeline()).await.unwrap();

        let calls = worker.calls();
        assert!(calls[0].context.is_empty());
        assert_eq!(calls[1].context.len(), 1);
        assert_eq!(calls[1].context[0].content, "keywords here");
        // The final stage gets the analysis, not the raw keyword output.
        assert_eq!(calls[2].context.len(), 1);
        assert_eq!(calls[2].context[0].stage, SEARCH_ANALYSIS);
        assert_eq!(calls[2].context[0].content, "analysis here");
    }

    #[tokio::test]
    async fn test_artifacts_written_per_stage() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Arc::new(MockStageWorker::new().with_output(KEYWORD_ANALYSIS, "## Keywords"));
        let executor = PipelineExecutor::new(worker, ArtifactStore::new(dir.path()));

        executor.run(&pipeline()).await.unwrap();

        let content = tokio::fs::read_to_string(
            dir.path().join("keyword_analysis_20260828_120000.md"),
        )
        .await
        .unwrap();
        assert_eq!(content, "## Keywords");
        assert!(dir.path().join("final_recommendations_20260828_120000.md").exists());
    }

    #[tokio::test]
    async fn test_failure_halts_run_and_skips_later_stages() {
        let dir = tempfile::tempdir().unwrap();
        let worker = Arc::new(MockStageWorker::new().failing_on(SEARCH_ANALYSIS));
        let executor = PipelineExecutor::new(worker.clone(), ArtifactStore::new(dir.path()));

        let err = executor.run(&pipeline()).await.unwrap_err();
        assert!(matches!(err, ResearcherError::Stage(_)));
        assert!(err.to_string().contains("search_analysis"));

        // First stage completed and left its artifact; nothing after it did.
        let calls = worker.calls();
        assert_eq!(calls.len(), 2);
        assert!(dir.path().join("keyword_analysis_20260828_120000.md").exists());
        assert!(!dir.path().join("search_analysis_20260828_120000.md").exists());
        assert!(!dir.path().join("final_recommendations_20260828_120000.md").exists());
    }
}
