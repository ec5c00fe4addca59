//! Error types for Storefront.
//!
//! A single `Error` enum covers everything that can fail while serving MCP
//! requests or loading configuration. Protocol-level failures (unknown tool,
//! missing handshake) live in [`ProtocolError`] and are wrapped by
//! `Error::Protocol`.
//!
//! # JSON-RPC Error Mapping
//!
//! Errors travelling back to an MCP client are mapped onto JSON-RPC 2.0
//! codes with [`Error::json_rpc_code`]:
//! - `Parse` → -32700
//! - `InvalidRequest` → -32600
//! - `MethodNotFound` → -32601
//! - `InvalidParams`, `ToolNotFound` → -32602 (MCP reports unknown tools as
//!   invalid params)
//! - `Internal` → -32603
//!
//! # Examples
//!
//! ```rust
//! use storefront_core::error::{Error, ProtocolError, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(Error::Protocol(ProtocolError::ToolNotFound(name.to_string())))
//! }
//!
//! assert_eq!(lookup("missing").unwrap_err().json_rpc_code(), -32602);
//! ```

use thiserror::Error;

/// Result type alias for Storefront operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Storefront operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Protocol layer error (unknown tool, missing handshake, etc.).
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request is malformed or violates JSON-RPC.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested method is not supported.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The provided parameters are invalid or do not match the declared schema.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// An internal server error occurred.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Failed to parse an inbound message.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input/output error from the underlying system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (invalid settings, unreadable file, etc.).
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Protocol-specific errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The requested tool is not registered on the server.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A request other than `initialize` arrived before the handshake.
    #[error("Server not initialized")]
    NotInitialized,

    /// A required parameter is missing from the request.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
}

impl Error {
    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a new invalid params error.
    ///
    /// ```rust
    /// use storefront_core::error::Error;
    ///
    /// let error = Error::invalid_params("arguments must be a JSON object");
    /// assert_eq!(error.json_rpc_code(), -32602);
    /// ```
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Get the JSON-RPC error code for this error.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::Parse(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams(_) | Self::Serialization(_) => -32602,
            Self::Protocol(ProtocolError::ToolNotFound(_)) => -32602,
            Self::Protocol(ProtocolError::MissingParameter(_)) => -32602,
            Self::Protocol(ProtocolError::NotInitialized) => -32600,
            Self::Internal(_) => -32603,
            _ => -32000, // Generic server error
        }
    }

    /// Check if this is a client-side error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_)
                | Self::MethodNotFound(_)
                | Self::InvalidParams(_)
                | Self::Parse(_)
                | Self::Serialization(_)
                | Self::Protocol(_)
        )
    }
}
