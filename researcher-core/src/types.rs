use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Desired depth of research.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    Brief,
    Moderate,
    #[default]
    Comprehensive,
}

impl ResearchDepth {
    /// Parse the enum-like text form ("brief" | "moderate" | "comprehensive").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "brief" => Some(Self::Brief),
            "moderate" => Some(Self::Moderate),
            "comprehensive" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Moderate => "moderate",
            Self::Comprehensive => "comprehensive",
        }
    }
}

/// A single research request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchTopic {
    /// The main topic to research.
    pub topic: String,
    /// Additional context or specific aspects to focus on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Desired depth of research.
    #[serde(default)]
    pub depth: ResearchDepth,
    /// The main objective of the research.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_objective: Option<String>,
    /// Any specific focus areas or constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_focus: Option<String>,
}

impl ResearchTopic {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            context: None,
            depth: ResearchDepth::default(),
            research_objective: None,
            specific_focus: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_depth(mut self, depth: ResearchDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.research_objective = Some(objective.into());
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.specific_focus = Some(focus.into());
        self
    }
}

/// Default maximum number of sources to consult per stage.
pub const DEFAULT_MAX_SOURCES: u32 = 5;

/// Validated request for a single run. Created once per run, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    pub research_topic: ResearchTopic,
    /// Maximum number of sources to consult.
    pub max_sources: u32,
    /// Whether to include citations in the recommendations.
    pub include_citations: bool,
}

impl RequestConfig {
    pub fn new(research_topic: ResearchTopic) -> Self {
        Self { research_topic, max_sources: DEFAULT_MAX_SOURCES, include_citations: true }
    }

    pub fn with_max_sources(mut self, max_sources: u32) -> Self {
        self.max_sources = max_sources;
        self
    }

    pub fn with_citations(mut self, include_citations: bool) -> Self {
        self.include_citations = include_citations;
        self
    }
}

/// Output produced by executing one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// Identifier of the originating stage.
    pub stage: String,
    /// Free-form text or serialized structured content.
    pub content: String,
}

impl StageResult {
    pub fn new(stage: impl Into<String>, content: impl Into<String>) -> Self {
        Self { stage: stage.into(), content: content.into() }
    }

    /// Returns the content parsed as a JSON object, if it is one.
    pub fn structured(&self) -> Option<Map<String, Value>> {
        match serde_json::from_str::<Value>(&self.content) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Ordered stage results for one run. Insertion order = execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResults {
    results: Vec<StageResult>,
}

impl RunResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: StageResult) {
        self.results.push(result);
    }

    pub fn get(&self, stage: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Final result object. Always carries exactly these three fields; a field is
/// an empty mapping when shaping its stage output failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchOutput {
    pub keyword_analysis: Map<String, Value>,
    pub search_analysis: Map<String, Value>,
    pub final_recommendations: Map<String, Value>,
}
