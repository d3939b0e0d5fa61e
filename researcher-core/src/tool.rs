use crate::{Result, model::ToolDeclaration};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A capability a role may be granted (web search, file read, file write).
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// JSON schema for the tool's arguments, offered to the model.
    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    async fn execute(&self, args: Value) -> Result<Value>;
}

/// The set of tools initialized for a run. Roles must request subsets of it.
#[derive(Clone, Default)]
pub struct Toolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl Toolset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for the named tools, in toolset order. Unknown names are
    /// skipped; the subset invariant is enforced at pipeline validation.
    pub fn declarations_for(&self, names: &[String]) -> Vec<ToolDeclaration> {
        self.tools
            .iter()
            .filter(|t| names.iter().any(|n| n == t.name()))
            .map(|t| ToolDeclaration {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema().unwrap_or_else(|| {
                    serde_json::json!({ "type": "object", "properties": {} })
                }),
            })
            .collect()
    }
}

impl std::fmt::Debug for Toolset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolset").field("tools", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTool {
        name: String,
    }

    #[async_trait]
    impl Tool for TestTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn execute(&self, _args: Value) -> Result<Value> {
            Ok(Value::String("result".to_string()))
        }
    }

    #[test]
    fn test_toolset_lookup() {
        let toolset = Toolset::new()
            .with_tool(Arc::new(TestTool { name: "web_search".to_string() }))
            .with_tool(Arc::new(TestTool { name: "file_read".to_string() }));

        assert!(toolset.contains("web_search"));
        assert!(!toolset.contains("file_write"));
        assert_eq!(toolset.names(), vec!["web_search", "file_read"]);
    }

    #[test]
    fn test_declarations_for_subset() {
        let toolset = Toolset::new()
            .with_tool(Arc::new(TestTool { name: "web_search".to_string() }))
            .with_tool(Arc::new(TestTool { name: "file_read".to_string() }));

        let decls = toolset.declarations_for(&["web_search".to_string()]);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "web_search");
        assert!(decls[0].parameters.is_object());
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = TestTool { name: "test".to_string() };
        let result = tool.execute(Value::Null).await.unwrap();
        assert_eq!(result, Value::String("result".to_string()));
    }
}
