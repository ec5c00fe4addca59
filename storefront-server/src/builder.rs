//! Builder pattern for creating MCP servers.
//!
//! # Examples
//!
//! ```rust
//! use storefront_server::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let server = McpServerBuilder::new()
//!         .with_info("Storefront MCP Server", "1.0.0")
//!         .with_tool(FunctionToolHandler::new(
//!             "hello",
//!             "Say hello",
//!             json!({"type": "object"}),
//!             |_| Ok(ToolsCallResponse::success(vec![Content::from("hello")])),
//!         ))
//!         .build()
//!         .await?;
//!
//!     assert_eq!(server.info().name, "Storefront MCP Server");
//!     Ok(())
//! }
//! ```

use crate::handlers::ToolHandler;
use crate::registry::ToolRegistry;
use crate::server::McpServer;
use std::sync::Arc;
use storefront_core::config::McpSettings;
use storefront_core::prelude::*;

/// Builder for creating MCP servers with a fluent API.
#[derive(Default)]
pub struct McpServerBuilder {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl McpServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `mcp` configuration section
    pub fn from_settings(settings: &McpSettings) -> Self {
        Self::new()
            .with_info(settings.name.clone(), settings.version.clone())
            .with_description(settings.description.clone())
    }

    /// Set server name and version.
    ///
    /// Both are sent to clients during the initialization handshake.
    pub fn with_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.version = Some(version.into());
        self
    }

    /// Human-readable description, sent as `instructions` on initialize
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into()).filter(|d| !d.is_empty());
        self
    }

    pub fn with_tool<T>(mut self, tool: T) -> Self
    where
        T: ToolHandler + 'static,
    {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Build the MCP server, registering every tool.
    ///
    /// Fails when name or version is missing or blank, or when two tools
    /// share a name.
    pub async fn build(self) -> Result<McpServer> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::InvalidRequest("Server name is required".to_string()))?;

        let version = self
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::InvalidRequest("Server version is required".to_string()))?;

        let registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register(tool).await?;
        }

        Ok(McpServer::new(
            Implementation { name, version },
            self.description,
            registry,
        ))
    }
}
