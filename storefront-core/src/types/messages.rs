//! Handshake and liveness messages

use super::*;

/// Protocol revisions this server understands, newest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Pick the protocol revision for a session.
///
/// A supported client revision is echoed back; anything else gets the newest
/// revision and the client decides whether it can continue.
pub fn negotiate_protocol_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .find(|v| **v == requested)
        .copied()
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}

/// Initialize request - first message sent by client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeRequest {
    /// The MCP protocol version supported by the client
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Client capabilities, kept opaque
    #[serde(default)]
    pub capabilities: serde_json::Value,
    /// Information about the client implementation
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,
}

/// Initialize response from server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// The MCP protocol version that will be used for this session
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// The capabilities supported by the server
    pub capabilities: ServerCapabilities,
    /// Information about the server implementation
    #[serde(rename = "serverInfo")]
    pub server_info: Implementation,
    /// Optional instructions for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Server capabilities advertised during initialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// Server tools capability for exposing callable tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

impl ServerCapabilities {
    /// Enable the tools capability
    pub fn with_tools(mut self, list_changed: bool) -> Self {
        self.tools = Some(ToolsCapability {
            list_changed: Some(list_changed),
        });
        self
    }
}

/// Tools capability (server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether the server sends tools list changed notifications
    #[serde(rename = "listChanged")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Ping response; MCP expects an empty object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PingResponse {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negotiate_known_version() {
        assert_eq!(negotiate_protocol_version("2024-11-05"), "2024-11-05");
    }

    #[test]
    fn test_negotiate_unknown_version_falls_back_to_latest() {
        assert_eq!(negotiate_protocol_version("1999-01-01"), "2025-06-18");
    }

    #[test]
    fn test_initialize_request_without_capabilities() {
        let request: InitializeRequest = serde_json::from_value(json!({
            "protocolVersion": "2025-06-18",
            "clientInfo": {"name": "inspector", "version": "0.1.0"}
        }))
        .unwrap();
        assert_eq!(request.client_info.name, "inspector");
        assert!(request.capabilities.is_null());
    }
}
