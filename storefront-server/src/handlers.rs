//! Handler traits and implementations for MCP tools

use async_trait::async_trait;
use storefront_core::prelude::*;

/// Trait for handling tool operations
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the tool information
    async fn tool(&self) -> Tool;

    /// Execute the tool with given arguments
    async fn call(&self, arguments: Option<serde_json::Value>) -> Result<ToolsCallResponse>;
}

type ToolFn = dyn Fn(Option<serde_json::Value>) -> Result<ToolsCallResponse> + Send + Sync;

/// Simple function-based tool handler
pub struct FunctionToolHandler {
    tool_info: Tool,
    handler: Box<ToolFn>,
}

impl FunctionToolHandler {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
        handler: F,
    ) -> Self
    where
        F: Fn(Option<serde_json::Value>) -> Result<ToolsCallResponse> + Send + Sync + 'static,
    {
        let tool_info = Tool::new(name, input_schema).with_description(description);

        Self {
            tool_info,
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl ToolHandler for FunctionToolHandler {
    async fn tool(&self) -> Tool {
        self.tool_info.clone()
    }

    async fn call(&self, arguments: Option<serde_json::Value>) -> Result<ToolsCallResponse> {
        (self.handler)(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_function_tool_handler() {
        let handler = FunctionToolHandler::new(
            "echo",
            "Echo the arguments back",
            json!({"type": "object"}),
            |args| {
                let text = args.map(|a| a.to_string()).unwrap_or_default();
                Ok(ToolsCallResponse::success(vec![Content::from(text)]))
            },
        );

        let tool = handler.tool().await;
        assert_eq!(tool.name, "echo");
        assert_eq!(tool.description.as_deref(), Some("Echo the arguments back"));

        let response = handler.call(Some(json!({"a": 1}))).await.unwrap();
        assert_eq!(response.content[0].as_text(), Some(r#"{"a":1}"#));
    }
}
