//! High-level MCP server implementation
//!
//! Messages are JSON-RPC 2.0. Two transports share one dispatcher:
//! newline-delimited stdio, where a session must `initialize` before calling
//! tools, and stateless HTTP `POST /mcp`.

use crate::registry::ToolRegistry;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use storefront_core::prelude::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

/// High-level MCP server
pub struct McpServer {
    info: Implementation,
    description: Option<String>,
    capabilities: ServerCapabilities,
    tools: ToolRegistry,
}

impl McpServer {
    /// Create a new server builder
    pub fn builder() -> crate::builder::McpServerBuilder {
        crate::builder::McpServerBuilder::new()
    }

    pub fn new(info: Implementation, description: Option<String>, tools: ToolRegistry) -> Self {
        Self {
            info,
            description,
            capabilities: ServerCapabilities::default().with_tools(false),
            tools,
        }
    }

    pub fn info(&self) -> &Implementation {
        &self.info
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle one raw message without session state.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match parse_message(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(response) => Some(response),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Handling MCP request");

        let result = self.dispatch(&request.method, request.params).await;

        let Some(id) = request.id else {
            if let Err(e) = result {
                warn!(method = %request.method, error = %e, "Notification failed");
            }
            return None;
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(Some(id), value),
            Err(e) => {
                if e.is_client_error() {
                    debug!(method = %request.method, error = %e, "Rejected MCP request");
                } else {
                    error!(method = %request.method, error = %e, "MCP request failed");
                }
                JsonRpcResponse::failure(Some(id), &e)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => {
                let request: InitializeRequest = required_params(params)?;
                Ok(serde_json::to_value(self.handle_initialize(request))?)
            }
            "notifications/initialized" => {
                info!("Client completed initialization");
                Ok(Value::Null)
            }
            "ping" => Ok(serde_json::to_value(PingResponse::default())?),
            "tools/list" => {
                let request = optional_params::<ToolsListRequest>(params)?;
                Ok(serde_json::to_value(self.tools.list_tools(request).await?)?)
            }
            "tools/call" => {
                let request: ToolsCallRequest = required_params(params)?;
                info!(tool = %request.name, "Calling tool");
                Ok(serde_json::to_value(self.tools.call_tool(request).await?)?)
            }
            other => Err(Error::MethodNotFound(other.to_string())),
        }
    }

    fn handle_initialize(&self, request: InitializeRequest) -> InitializeResponse {
        let protocol_version = negotiate_protocol_version(&request.protocol_version);

        info!(
            client = %request.client_info.name,
            client_version = %request.client_info.version,
            requested = %request.protocol_version,
            protocol_version,
            "Client initialized"
        );

        InitializeResponse {
            protocol_version: protocol_version.to_string(),
            capabilities: self.capabilities.clone(),
            server_info: self.info.clone(),
            instructions: self.description.clone(),
        }
    }

    /// Serve newline-delimited JSON-RPC until `reader` is exhausted
    pub async fn serve_lines<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut session = Session::new(self);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            // a bad line costs one parse error, not the session
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => session.handle_line(line.trim()).await,
                Err(e) => {
                    warn!(error = %e, "Dropping non UTF-8 input line");
                    Some(JsonRpcResponse::failure(
                        None,
                        &Error::Parse(format!("invalid UTF-8: {e}")),
                    ))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, stopping MCP session");
        Ok(())
    }

    /// Run the server using stdio transport
    pub async fn run_stdio(&self) -> Result<()> {
        info!("Starting MCP server with stdio transport");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Router exposing `POST /mcp`
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/mcp", post(handle_http_request))
            .layer(CorsLayer::permissive())
            .with_state(self)
    }

    /// Run the server using HTTP transport until `shutdown` resolves
    pub async fn run_http<F>(self: Arc<Self>, addr: &str, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting MCP server with HTTP transport on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("HTTP server listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Per-connection state for stream transports.
///
/// Until a successful `initialize`, everything except `initialize` and
/// `ping` is refused and notifications are dropped.
pub struct Session<'a> {
    server: &'a McpServer,
    initialized: bool,
}

impl<'a> Session<'a> {
    pub fn new(server: &'a McpServer) -> Self {
        Self {
            server,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let request = match parse_message(line) {
            Ok(request) => request,
            Err(response) => return Some(response),
        };

        let is_initialize = request.method == "initialize";
        if !self.initialized && !is_initialize && request.method != "ping" {
            let id = request.id?;
            return Some(JsonRpcResponse::failure(
                Some(id),
                &Error::Protocol(ProtocolError::NotInitialized),
            ));
        }

        let response = self.server.handle_request(request).await;
        if is_initialize && response.as_ref().is_some_and(|r| r.error.is_none()) {
            self.initialized = true;
        }
        response
    }
}

/// Parse one message; failures come back as ready-to-send error responses
fn parse_message(raw: &str) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| JsonRpcResponse::failure(None, &Error::Parse(e.to_string())))?;

    if value.is_array() {
        return Err(JsonRpcResponse::failure(
            None,
            &Error::InvalidRequest("Batch requests are not supported".to_string()),
        ));
    }

    let id = value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<RequestId>(id).ok());

    let request: JsonRpcRequest = serde_json::from_value(value)
        .map_err(|e| JsonRpcResponse::failure(id.clone(), &Error::InvalidRequest(e.to_string())))?;

    if request.jsonrpc != "2.0" {
        return Err(JsonRpcResponse::failure(
            id,
            &Error::InvalidRequest("jsonrpc must be \"2.0\"".to_string()),
        ));
    }

    Ok(request)
}

fn required_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let params = params.ok_or_else(|| ProtocolError::MissingParameter("params".to_string()))?;
    Ok(serde_json::from_value(params)?)
}

fn optional_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T> {
    match params {
        Some(params) if !params.is_null() => Ok(serde_json::from_value(params)?),
        _ => Ok(T::default()),
    }
}

/// HTTP request handler for MCP over HTTP
async fn handle_http_request(State(server): State<Arc<McpServer>>, body: String) -> Response {
    match server.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
