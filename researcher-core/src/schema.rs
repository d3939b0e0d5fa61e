//! Validation and coercion of raw request records into [`RequestConfig`].

use crate::{
    ResearcherError, Result,
    types::{DEFAULT_MAX_SOURCES, RequestConfig, ResearchDepth, ResearchTopic},
};
use serde_json::Value;

impl RequestConfig {
    /// Validate and coerce an arbitrary input record.
    ///
    /// Unknown fields are ignored. Fails with a `Validation` error when
    /// `topic` is missing or empty, `max_sources` is not a positive integer,
    /// or `include_citations` is not boolean-coercible.
    pub fn from_value(value: &Value) -> Result<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| ResearcherError::Validation("request must be an object".to_string()))?;

        let topic_record = record
            .get("research_topic")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                ResearcherError::Validation("research_topic object is required".to_string())
            })?;

        let topic = topic_record
            .get("topic")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ResearcherError::Validation("topic is required".to_string()))?;

        let depth = match topic_record.get("depth") {
            None | Some(Value::Null) => ResearchDepth::default(),
            Some(Value::String(s)) => ResearchDepth::parse(s).ok_or_else(|| {
                ResearcherError::Validation(format!(
                    "depth must be one of brief, moderate, comprehensive; got '{s}'"
                ))
            })?,
            Some(other) => {
                return Err(ResearcherError::Validation(format!(
                    "depth must be a string, got {other}"
                )));
            }
        };

        let mut research_topic = ResearchTopic::new(topic).with_depth(depth);
        if let Some(context) = optional_text(topic_record.get("context")) {
            research_topic = research_topic.with_context(context);
        }
        if let Some(objective) = optional_text(topic_record.get("research_objective")) {
            research_topic = research_topic.with_objective(objective);
        }
        if let Some(focus) = optional_text(topic_record.get("specific_focus")) {
            research_topic = research_topic.with_focus(focus);
        }

        let max_sources = match record.get("max_sources") {
            None | Some(Value::Null) => DEFAULT_MAX_SOURCES,
            Some(value) => coerce_positive_int(value)?,
        };

        let include_citations = match record.get("include_citations") {
            None | Some(Value::Null) => true,
            Some(value) => coerce_bool(value)?,
        };

        Ok(RequestConfig::new(research_topic)
            .with_max_sources(max_sources)
            .with_citations(include_citations))
    }
}

/// Non-empty trimmed string, or None for absent/null/empty values.
fn optional_text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

fn coerce_positive_int(value: &Value) -> Result<u32> {
    let n = value.as_u64().filter(|n| *n > 0).ok_or_else(|| {
        ResearcherError::Validation(format!("max_sources must be a positive integer, got {value}"))
    })?;
    u32::try_from(n).map_err(|_| {
        ResearcherError::Validation(format!("max_sources {n} is out of range"))
    })
}

fn coerce_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ResearcherError::Validation(format!(
                "include_citations must be a boolean, got '{s}'"
            ))),
        },
        other => Err(ResearcherError::Validation(format!(
            "include_citations must be a boolean, got {other}"
        ))),
    }
}
