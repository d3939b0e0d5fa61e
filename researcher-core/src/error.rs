#[derive(Debug, thiserror::Error)]
pub enum ResearcherError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Stage execution error: {0}")]
    Stage(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Result shaping error: {0}")]
    Shaping(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResearcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_kind() {
        let err = ResearcherError::Validation("topic is required".to_string());
        assert_eq!(err.to_string(), "Validation error: topic is required");

        let err = ResearcherError::Shaping("stage 'search_analysis' produced empty content".to_string());
        assert_eq!(
            err.to_string(),
            "Result shaping error: stage 'search_analysis' produced empty content"
        );

        let err = ResearcherError::Config("role requires tool 'web_search'".to_string());
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_io_error_converts() {
        fn write_artifact() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "output-files").into())
        }
        let err = write_artifact().unwrap_err();
        assert!(matches!(err, ResearcherError::Io(_)));
        assert!(err.to_string().contains("output-files"));
    }

    #[test]
    fn test_serde_error_converts() {
        fn parse_stage_output() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("not a json document")?)
        }
        let err = parse_stage_output().unwrap_err();
        assert!(matches!(err, ResearcherError::Serde(_)));
    }
}
