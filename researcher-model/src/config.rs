//! Configuration types for the OpenAI-compatible provider.

use serde::{Deserialize, Serialize};

/// Default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible chat-completions API.
///
/// # Example
///
/// ```rust,ignore
/// use researcher_model::OpenAIConfig;
///
/// let config = OpenAIConfig::new(std::env::var("OPENAI_API_KEY").unwrap(), "gpt-4o");
///
/// // With a custom base URL
/// let config = OpenAIConfig::new("your-api-key", "my-model")
///     .with_base_url("https://custom-endpoint.example.com/v1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Optional custom base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), base_url: None }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAIConfig::new("key", "gpt-4o");
        assert_eq!(config.model, "gpt-4o");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_config_custom_base_url() {
        let config =
            OpenAIConfig::new("key", "gpt-4o").with_base_url("https://example.com/v1");
        assert_eq!(config.base_url.as_deref(), Some("https://example.com/v1"));
    }
}
