//! Stage definitions and the pipeline builder.
//!
//! A run is always the same three stages in the same order, chained linearly:
//! keyword analysis, search analysis, synthesis. Each stage after the first
//! lists exactly its predecessor as upstream context.

use crate::role::{ResearchRoles, Role};
use researcher_core::{RequestConfig, ResearcherError, Result, Toolset};
use std::sync::Arc;

pub const KEYWORD_ANALYSIS: &str = "keyword_analysis";
pub const SEARCH_ANALYSIS: &str = "search_analysis";
pub const FINAL_RECOMMENDATIONS: &str = "final_recommendations";

/// One unit of pipeline work. Read-only once the pipeline is built.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Stage identifier.
    pub id: String,
    /// Instructional description handed to the reasoning process.
    pub description: String,
    /// Persona assigned to this stage.
    pub role: Arc<Role>,
    /// Identifiers of the stages whose outputs become additional context.
    pub upstream: Vec<String>,
    /// Artifact file name, `<stage>_<timestamp>.md`.
    pub artifact_file: String,
}

/// The ordered stage list for one run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Check the run invariants: every role's permitted tools must exist in
    /// the run toolset, and every upstream reference must point at an earlier
    /// stage.
    pub fn validate(&self, toolset: &Toolset) -> Result<()> {
        for (position, stage) in self.stages.iter().enumerate() {
            for tool in &stage.role.tools {
                if !toolset.contains(tool) {
                    return Err(ResearcherError::Config(format!(
                        "role '{}' requires tool '{tool}' which is not initialized for this run",
                        stage.role.name
                    )));
                }
            }
            for upstream in &stage.upstream {
                let found = self.stages[..position].iter().any(|s| &s.id == upstream);
                if !found {
                    return Err(ResearcherError::Config(format!(
                        "stage '{}' references upstream '{upstream}' which does not precede it",
                        stage.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Build the three-stage pipeline for a request. The timestamp is computed
/// once by the caller and shared by all artifact names so they correlate.
pub fn build_pipeline(request: &RequestConfig, roles: &ResearchRoles, timestamp: &str) -> Pipeline {
    Pipeline {
        stages: vec![
            Stage {
                id: KEYWORD_ANALYSIS.to_string(),
                description: keyword_analysis_description(request),
                role: roles.keyword_researcher.clone(),
                upstream: vec![],
                artifact_file: format!("{KEYWORD_ANALYSIS}_{timestamp}.md"),
            },
            Stage {
                id: SEARCH_ANALYSIS.to_string(),
                description: search_analysis_description(request),
                role: roles.search_analyst.clone(),
                upstream: vec![KEYWORD_ANALYSIS.to_string()],
                artifact_file: format!("{SEARCH_ANALYSIS}_{timestamp}.md"),
            },
            Stage {
                id: FINAL_RECOMMENDATIONS.to_string(),
                description: final_recommendations_description(request),
                role: roles.insights_compiler.clone(),
                upstream: vec![SEARCH_ANALYSIS.to_string()],
                artifact_file: format!("{FINAL_RECOMMENDATIONS}_{timestamp}.md"),
            },
        ],
    }
}

fn keyword_analysis_description(request: &RequestConfig) -> String {
    let topic = &request.research_topic;
    let mut description = format!(
        "Analyze the following topic and identify potential keywords and search phrases:\n\
         TOPIC: \"{}\"\n",
        topic.topic
    );
    // Absent optional fields render nothing, never a placeholder.
    if let Some(objective) = &topic.research_objective {
        description.push_str(&format!("RESEARCH OBJECTIVE: \"{objective}\"\n"));
    }
    if let Some(focus) = &topic.specific_focus {
        description.push_str(&format!("SPECIFIC FOCUS: \"{focus}\"\n"));
    }
    description.push_str(
        "\n1. Break down the topic into main concepts\n\
         2. Generate primary keywords for each concept\n\
         3. Identify related terms and synonyms\n\
         4. Consider different search intents\n\
         5. List at least 5 potential search phrases\n",
    );
    description.push_str(&format!(
        "\nConsult at most {} sources when exploring the topic.",
        request.max_sources
    ));
    description
}

fn search_analysis_description(request: &RequestConfig) -> String {
    format!(
        "Evaluate the effectiveness of the proposed keywords by analyzing search results:\n\
         1. Test each main keyword/phrase identified\n\
         2. Analyze the relevance of returned results\n\
         3. Identify gaps or irrelevant results\n\
         4. Suggest modifications to improve search accuracy\n\
         \n\
         Consult at most {} sources per keyword tested.",
        request.max_sources
    )
}

fn final_recommendations_description(request: &RequestConfig) -> String {
    let mut description = "Compile final keyword recommendations and search strategy:\n\
         1. Synthesize findings from keyword research and search analysis\n\
         2. Create a prioritized list of recommended search terms\n\
         3. Group related terms and phrases\n\
         4. Provide specific recommendations for different search objectives\n"
        .to_string();
    if request.include_citations {
        description.push_str(
            "\nInclude citations (source links) for recommendations backed by search results.",
        );
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::research_roles;
    use researcher_core::{ModelConfig, ResearchTopic};

    fn request(topic: ResearchTopic) -> RequestConfig {
        RequestConfig::new(topic)
    }

    fn roles() -> ResearchRoles {
        research_roles(&ModelConfig::default())
    }

    #[test]
    fn test_three_stages_in_order() {
        let pipeline =
            build_pipeline(&request(ResearchTopic::new("rust")), &roles(), "20260828_120000");
        let ids: Vec<&str> = pipeline.stages().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![KEYWORD_ANALYSIS, SEARCH_ANALYSIS, FINAL_RECOMMENDATIONS]);
    }

    #[test]
    fn test_linear_upstream_chain() {
        let pipeline =
            build_pipeline(&request(ResearchTopic::new("rust")), &roles(), "20260828_120000");
        let stages = pipeline.stages();

        assert!(stages[0].upstream.is_empty());
        assert_eq!(stages[1].upstream, vec![KEYWORD_ANALYSIS]);
        // Chained context: stage 3 sees stage 2 only, never stage 1 directly.
        assert_eq!(stages[2].upstream, vec![SEARCH_ANALYSIS]);
    }

    #[test]
    fn test_artifact_names_share_timestamp() {
        let pipeline =
            build_pipeline(&request(ResearchTopic::new("rust")), &roles(), "20260828_120000");
        for stage in pipeline.stages() {
            assert_eq!(stage.artifact_file, format!("{}_20260828_120000.md", stage.id));
        }
    }

    #[test]
    fn test_description_substitutes_optional_fields() {
        let topic = ResearchTopic::new("AI agents")
            .with_objective("survey recent work")
            .with_focus("open-source frameworks");
        let pipeline = build_pipeline(&request(topic), &roles(), "20260828_120000");
        let description = &pipeline.stages()[0].description;

        assert!(description.contains("TOPIC: \"AI agents\""));
        assert!(description.contains("RESEARCH OBJECTIVE: \"survey recent work\""));
        assert!(description.contains("SPECIFIC FOCUS: \"open-source frameworks\""));
    }

    #[test]
    fn test_description_omits_absent_fields_without_placeholders() {
        let pipeline =
            build_pipeline(&request(ResearchTopic::new("AI agents")), &roles(), "20260828_120000");
        let description = &pipeline.stages()[0].description;

        assert!(description.contains("TOPIC: \"AI agents\""));
        assert!(description.contains("List at least 5 potential search phrases"));
        assert!(!description.contains("None"));
        assert!(!description.contains("RESEARCH OBJECTIVE"));
        assert!(!description.contains("SPECIFIC FOCUS"));
    }

    #[test]
    fn test_max_sources_and_citations_threaded() {
        let config = request(ResearchTopic::new("rust")).with_max_sources(3);
        let pipeline = build_pipeline(&config, &roles(), "20260828_120000");
        assert!(pipeline.stages()[0].description.contains("at most 3 sources"));
        assert!(pipeline.stages()[1].description.contains("at most 3 sources"));
        assert!(pipeline.stages()[2].description.contains("Include citations"));

        let without = request(ResearchTopic::new("rust")).with_citations(false);
        let pipeline = build_pipeline(&without, &roles(), "20260828_120000");
        assert!(!pipeline.stages()[2].description.contains("Include citations"));
    }

    #[test]
    fn test_validate_accepts_matching_toolset() {
        use async_trait::async_trait;
        use researcher_core::{Tool, Toolset};
        use serde_json::Value;

        struct StubSearch;

        #[async_trait]
        impl Tool for StubSearch {
            fn name(&self) -> &str {
                "web_search"
            }
            fn description(&self) -> &str {
                "stub"
            }
            async fn execute(&self, _args: Value) -> researcher_core::Result<Value> {
                Ok(Value::Null)
            }
        }

        let pipeline =
            build_pipeline(&request(ResearchTopic::new("rust")), &roles(), "20260828_120000");

        let toolset = Toolset::new().with_tool(Arc::new(StubSearch));
        assert!(pipeline.validate(&toolset).is_ok());

        let empty = Toolset::new();
        let err = pipeline.validate(&empty).unwrap_err();
        assert!(matches!(err, ResearcherError::Config(_)));
    }
}
