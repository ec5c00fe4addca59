//! Registry for the tools a server exposes

use crate::handlers::ToolHandler;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_core::prelude::*;
use tokio::sync::RwLock;
use tracing::debug;

/// Tools per `tools/list` page
pub const PAGE_SIZE: usize = 50;

/// Registry for tool handlers, keyed by tool name
#[derive(Clone, Default)]
pub struct ToolRegistry {
    handlers: Arc<RwLock<HashMap<String, Arc<dyn ToolHandler>>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool handler. Names must be unique.
    pub async fn register(&self, handler: Arc<dyn ToolHandler>) -> Result<()> {
        let name = handler.tool().await.name;
        let mut handlers = self.handlers.write().await;

        if handlers.contains_key(&name) {
            return Err(Error::configuration(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        debug!(tool = %name, "Registered tool");
        handlers.insert(name, handler);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.handlers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handlers.read().await.is_empty()
    }

    /// List tools sorted by name.
    ///
    /// The cursor is the offset of the first tool on the page, as returned in
    /// `nextCursor` by the previous page.
    pub async fn list_tools(&self, request: ToolsListRequest) -> Result<ToolsListResponse> {
        let mut tools = Vec::new();
        {
            let handlers = self.handlers.read().await;
            for handler in handlers.values() {
                tools.push(handler.tool().await);
            }
        }
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        let start_index = match &request.pagination.cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| Error::invalid_params(format!("Invalid cursor: {}", cursor)))?,
            None => 0,
        };

        let start_index = start_index.min(tools.len());
        let end_index = (start_index + PAGE_SIZE).min(tools.len());
        let next_cursor = (end_index < tools.len()).then(|| end_index.to_string());
        let page_tools = tools.drain(start_index..end_index).collect();

        Ok(ToolsListResponse {
            tools: page_tools,
            next_cursor,
            meta: ResponseMetadata::default(),
        })
    }

    /// Call a specific tool.
    ///
    /// Arguments must match the top-level type of the tool's input schema;
    /// a JSON `null` counts as no arguments.
    pub async fn call_tool(&self, request: ToolsCallRequest) -> Result<ToolsCallResponse> {
        let handler = self
            .handlers
            .read()
            .await
            .get(&request.name)
            .cloned()
            .ok_or_else(|| Error::Protocol(ProtocolError::ToolNotFound(request.name.clone())))?;

        let arguments = request.arguments.filter(|a| !a.is_null());
        let tool = handler.tool().await;
        if let Some(args) = &arguments
            && tool.schema_type() == Some("object")
            && !args.is_object()
        {
            return Err(Error::invalid_params(format!(
                "Arguments for '{}' must be a JSON object",
                tool.name
            )));
        }

        handler.call(arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::FunctionToolHandler;
    use serde_json::json;

    fn echo(name: &str) -> Arc<dyn ToolHandler> {
        Arc::new(FunctionToolHandler::new(
            name,
            "echo",
            json!({"type": "object", "properties": {}, "required": []}),
            |_| Ok(ToolsCallResponse::success(vec![Content::from("ok")])),
        ))
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let registry = ToolRegistry::new();
        registry.register(echo("a")).await.unwrap();
        assert!(registry.register(echo("a")).await.is_err());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_paginated() {
        let registry = ToolRegistry::new();
        for i in (0..60).rev() {
            registry.register(echo(&format!("tool_{i:02}"))).await.unwrap();
        }

        let first = registry.list_tools(ToolsListRequest::new()).await.unwrap();
        assert_eq!(first.tools.len(), PAGE_SIZE);
        assert_eq!(first.tools[0].name, "tool_00");
        assert_eq!(first.next_cursor.as_deref(), Some("50"));

        let second = registry
            .list_tools(ToolsListRequest::new().with_cursor("50"))
            .await
            .unwrap();
        assert_eq!(second.tools.len(), 10);
        assert_eq!(second.tools[9].name, "tool_59");
        assert!(second.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_bad_cursor_is_invalid_params() {
        let registry = ToolRegistry::new();
        let err = registry
            .list_tools(ToolsListRequest::new().with_cursor("abc"))
            .await
            .unwrap_err();
        assert_eq!(err.json_rpc_code(), -32602);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .call_tool(ToolsCallRequest::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::ToolNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_argument_shape_checked() {
        let registry = ToolRegistry::new();
        registry.register(echo("stats")).await.unwrap();

        let err = registry
            .call_tool(ToolsCallRequest::new("stats").with_arguments(json!("text")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));

        for args in [json!(null), json!({}), json!({"verbose": true})] {
            let response = registry
                .call_tool(ToolsCallRequest::new("stats").with_arguments(args))
                .await
                .unwrap();
            assert_eq!(response.is_error, Some(false));
        }
    }
}
