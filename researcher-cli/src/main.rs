mod telemetry;

use anyhow::{Context, Result, bail};
use clap::Parser;
use researcher_core::{ModelConfig, ResearchDepth, ResearchTopic, Toolset};
use researcher_model::{OpenAIChatModel, OpenAIConfig};
use researcher_pipeline::{LlmStageWorker, Orchestrator};
use researcher_tool::{FileReadTool, FileWriteTool, WebSearchTool};
use std::sync::Arc;

/// Keyword research pipeline: analyze a topic, evaluate search results, and
/// compile keyword recommendations.
#[derive(Parser, Debug)]
#[command(name = "researcher", version, about)]
struct Cli {
    /// Topic to research
    topic: String,

    /// Additional context or aspects to focus on
    #[arg(long)]
    context: Option<String>,

    /// Research depth
    #[arg(long, default_value = "comprehensive", value_parser = parse_depth)]
    depth: ResearchDepth,

    /// Main objective of the research
    #[arg(long)]
    objective: Option<String>,

    /// Specific focus areas or constraints
    #[arg(long)]
    focus: Option<String>,

    /// Maximum number of sources to consult per stage
    #[arg(long, default_value_t = 5)]
    max_sources: u32,

    /// Omit citations from the final recommendations
    #[arg(long)]
    no_citations: bool,

    /// Model to use
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    /// Directory for stage output artifacts
    #[arg(long, default_value = "output-files")]
    output_dir: String,
}

fn parse_depth(s: &str) -> std::result::Result<ResearchDepth, String> {
    ResearchDepth::parse(s)
        .ok_or_else(|| format!("invalid depth '{s}' (expected brief, moderate, or comprehensive)"))
}

fn search_tool(api_key: String, max_sources: u32) -> WebSearchTool {
    WebSearchTool::new(api_key).with_max_results(max_sources)
}

fn build_toolset(serper_key: String, max_sources: u32) -> Toolset {
    Toolset::new()
        .with_tool(Arc::new(search_tool(serper_key, max_sources)))
        .with_tool(Arc::new(FileReadTool::new()))
        .with_tool(Arc::new(FileWriteTool::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_logging();

    let cli = Cli::parse();
    if cli.max_sources == 0 {
        bail!("--max-sources must be at least 1");
    }

    let openai_key = std::env::var("OPENAI_API_KEY").ok();
    let serper_key = std::env::var("SERPER_API_KEY").ok();
    tracing::info!(
        openai_key = openai_key.is_some(),
        serper_key = serper_key.is_some(),
        "credentials loaded"
    );

    let Some(openai_key) = openai_key else {
        bail!("OPENAI_API_KEY is not set");
    };
    let Some(serper_key) = serper_key else {
        bail!("SERPER_API_KEY is not set");
    };

    let model_config = ModelConfig::new(&cli.model, cli.temperature);
    let model = Arc::new(
        OpenAIChatModel::new(OpenAIConfig::new(openai_key, &cli.model))
            .context("failed to create model client")?,
    );

    let toolset = build_toolset(serper_key, cli.max_sources);

    let worker = Arc::new(LlmStageWorker::new(model, toolset.clone()));
    let orchestrator = Orchestrator::new(worker)
        .with_toolset(toolset)
        .with_model_config(model_config)
        .with_output_dir(&cli.output_dir);

    let mut topic = ResearchTopic::new(&cli.topic).with_depth(cli.depth);
    if let Some(context) = cli.context {
        topic = topic.with_context(context);
    }
    if let Some(objective) = cli.objective {
        topic = topic.with_objective(objective);
    }
    if let Some(focus) = cli.focus {
        topic = topic.with_focus(focus);
    }
    let request = researcher_core::RequestConfig::new(topic)
        .with_max_sources(cli.max_sources)
        .with_citations(!cli.no_citations);

    let output = orchestrator.run_validated(&request).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_tool_bounded_by_max_sources() {
        assert_eq!(search_tool("key".to_string(), 3).max_results(), 3);
        // The Serper cap still wins over an oversized request.
        assert_eq!(search_tool("key".to_string(), 50).max_results(), 10);
    }

    #[test]
    fn test_toolset_covers_role_requirements() {
        let toolset = build_toolset("key".to_string(), 5);
        assert_eq!(toolset.names(), vec!["web_search", "file_read", "file_write"]);
    }
}
