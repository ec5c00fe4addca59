//! Tool-related types and messages for the Model Context Protocol.
//!
//! Tools are functions an agent can call. Each tool describes its arguments
//! with a JSON schema; a call returns content blocks and, optionally, the
//! same payload as structured JSON.
//!
//! # Example
//!
//! ```rust
//! use storefront_core::types::Tool;
//! use serde_json::json;
//!
//! let tool = Tool::new(
//!     "system_stats",
//!     json!({"type": "object", "properties": {}, "required": []}),
//! )
//! .with_description("Report runtime facts");
//! assert_eq!(tool.name, "system_stats");
//! ```

use super::*;
use smallvec::SmallVec;

/// Tool represents a function that can be called by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// The unique name of the tool.
    pub name: String,
    /// Optional human-readable description of what the tool does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl Tool {
    /// Creates a new tool with the given name and input schema
    pub fn new(name: impl Into<String>, input_schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema,
        }
    }

    /// Adds a description to the tool
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The top-level `type` declared by the input schema, if any
    pub fn schema_type(&self) -> Option<&str> {
        self.input_schema.get("type").and_then(|t| t.as_str())
    }
}

/// Request to list available tools from the server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolsListRequest {
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ToolsListRequest {
    /// Creates a new tools list request with default pagination
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cursor for pagination
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.pagination.cursor = Some(cursor.into());
        self
    }
}

/// Response to list tools request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResponse {
    /// List of available tools.
    pub tools: Vec<Tool>,
    /// Cursor for pagination. Present if there are more tools to fetch.
    #[serde(rename = "nextCursor")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Response metadata
    #[serde(flatten)]
    pub meta: ResponseMetadata,
}

/// Request to call a tool with specific arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallRequest {
    /// The name of the tool to call.
    pub name: String,
    /// Arguments to pass to the tool, structured according to its input schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Value>,
}

impl ToolsCallRequest {
    /// Creates a new tool call request for the given tool
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    /// Sets the arguments for the tool call
    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// Response to tool call request.
///
/// `content` uses `SmallVec` since tool results almost always carry one or
/// two blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCallResponse {
    /// Content produced by the tool execution.
    pub content: SmallVec<[Content; 2]>,
    /// Machine-readable copy of the result.
    #[serde(rename = "structuredContent")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<serde_json::Value>,
    /// Whether the tool execution resulted in an error.
    #[serde(rename = "isError")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    /// Response metadata
    #[serde(flatten)]
    pub meta: ResponseMetadata,
}

impl ToolsCallResponse {
    /// Create a successful tool response with content.
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content: content.into(),
            structured_content: None,
            is_error: Some(false),
            meta: ResponseMetadata::default(),
        }
    }

    /// Successful response carrying a JSON object both as pretty-printed
    /// text and as `structuredContent`.
    pub fn structured(value: serde_json::Value) -> crate::Result<Self> {
        let text = serde_json::to_string_pretty(&value)?;
        let mut response = Self::success(vec![Content::from(text)]);
        response.structured_content = Some(value);
        Ok(response)
    }
}
