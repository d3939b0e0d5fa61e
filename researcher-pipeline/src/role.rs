//! Role definitions for the research personas.
//!
//! A [`Role`] is plain data: persona text, permitted tool capabilities, and a
//! reference to the shared model configuration. Roles are built once per run
//! and shared by `Arc` across the stages that use them; nothing mutates a
//! role after construction.

use researcher_core::ModelConfig;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Role {
    /// Name/title of the persona.
    pub name: String,
    /// Goal statement.
    pub goal: String,
    /// Backstory text.
    pub backstory: String,
    /// Names of the tools this role may use.
    pub tools: Vec<String>,
    /// Shared language-model configuration.
    pub model_config: ModelConfig,
}

impl Role {
    pub fn new(
        name: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        model_config: ModelConfig,
    ) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            model_config,
        }
    }

    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }
}

/// The three research personas, constructed fresh per run.
#[derive(Debug, Clone)]
pub struct ResearchRoles {
    pub keyword_researcher: Arc<Role>,
    pub search_analyst: Arc<Role>,
    pub insights_compiler: Arc<Role>,
}

/// Build the three personas, all sharing the same model configuration and
/// web-search access.
pub fn research_roles(model_config: &ModelConfig) -> ResearchRoles {
    ResearchRoles {
        keyword_researcher: Arc::new(
            Role::new(
                "Expert Keyword Research Specialist",
                "Analyze topics and identify the most effective search terms and phrases",
                "Expert keyword research specialist with deep understanding of search behavior \
                 and semantic analysis. Skilled at breaking down topics into relevant search terms.",
                model_config.clone(),
            )
            .with_tool("web_search"),
        ),
        search_analyst: Arc::new(
            Role::new(
                "Search Results Analyst",
                "Evaluate and refine search queries based on initial results",
                "Analytical expert specializing in evaluating search results and identifying \
                 patterns in successful queries.",
                model_config.clone(),
            )
            .with_tool("web_search"),
        ),
        insights_compiler: Arc::new(
            Role::new(
                "Research Insights Compiler",
                "Synthesize findings and create structured recommendations",
                "Research synthesis specialist who excels at organizing insights into clear, \
                 actionable recommendations.",
                model_config.clone(),
            )
            .with_tool("web_search"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_builder() {
        let role = Role::new("Analyst", "analyze", "backstory", ModelConfig::default())
            .with_tool("web_search")
            .with_tool("file_read");
        assert_eq!(role.tools, vec!["web_search", "file_read"]);
    }

    #[test]
    fn test_research_roles_share_model_config() {
        let config = ModelConfig::new("gpt-4o", 0.2);
        let roles = research_roles(&config);

        assert_eq!(roles.keyword_researcher.model_config.temperature, 0.2);
        assert_eq!(roles.search_analyst.model_config.model, "gpt-4o");
        assert_eq!(roles.insights_compiler.model_config.model, "gpt-4o");
    }

    #[test]
    fn test_all_roles_have_search_access() {
        let roles = research_roles(&ModelConfig::default());
        for role in [&roles.keyword_researcher, &roles.search_analyst, &roles.insights_compiler] {
            assert!(role.tools.contains(&"web_search".to_string()));
        }
    }
}
