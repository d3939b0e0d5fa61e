//! File read/write tools.

use async_trait::async_trait;
use researcher_core::{ResearcherError, Result, Tool};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads a UTF-8 text file and returns its contents.
pub struct FileReadTool {
    root: Option<PathBuf>,
}

impl FileReadTool {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Restrict reads to paths under `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl Default for FileReadTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "file_read"
    }

    fn description(&self) -> &str {
        "Reads a text file and returns its contents."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Path of the file to read" }
            },
            "required": ["path"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let path = required_path(&args, self.root.as_deref())?;
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ResearcherError::Tool(format!("Failed to read {}: {e}", path.display()))
        })?;
        Ok(serde_json::json!({ "path": path.display().to_string(), "content": content }))
    }
}

/// Writes text content to a file, creating parent directories as needed.
pub struct FileWriteTool {
    root: Option<PathBuf>,
}

impl FileWriteTool {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Restrict writes to paths under `root`.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
}

impl Default for FileWriteTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        "file_write"
    }

    fn description(&self) -> &str {
        "Writes text content to a file."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(serde_json::json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Path of the file to write" },
                "content": { "type": "string", "description": "Content to write" }
            },
            "required": ["path", "content"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let path = required_path(&args, self.root.as_deref())?;
        let content = args
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| ResearcherError::Tool("file_write requires content".to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ResearcherError::Tool(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, content).await.map_err(|e| {
            ResearcherError::Tool(format!("Failed to write {}: {e}", path.display()))
        })?;

        Ok(serde_json::json!({ "path": path.display().to_string(), "bytes": content.len() }))
    }
}

/// Extract the `path` argument, resolving it under `root` when one is set.
/// Absolute paths and `..` traversal are rejected for rooted tools.
fn required_path(args: &Value, root: Option<&Path>) -> Result<PathBuf> {
    let raw = args
        .get("path")
        .and_then(Value::as_str)
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ResearcherError::Tool("a path argument is required".to_string()))?;

    let path = PathBuf::from(raw);
    match root {
        None => Ok(path),
        Some(root) => {
            if path.is_absolute()
                || path.components().any(|c| matches!(c, std::path::Component::ParentDir))
            {
                return Err(ResearcherError::Tool(format!(
                    "path '{raw}' escapes the tool root"
                )));
            }
            Ok(root.join(path))
        }
    }
}
