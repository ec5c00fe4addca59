//! # Storefront Server
//!
//! MCP server exposing Storefront diagnostics to tool-calling agents.
//!
//! The server ships one tool, `system_stats`, which reports runtime versions,
//! environment settings and whether the configured datastore is reachable.
//! Transports are newline-delimited stdio and HTTP `POST /mcp`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_core::config::AppConfig;
//! use storefront_server::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default();
//!     let probe = Arc::new(TcpDatastoreProbe::from_settings(&config.database));
//!
//!     let server = McpServer::builder()
//!         .with_info(config.mcp.name.clone(), config.mcp.version.clone())
//!         .with_tool(SystemStatsTool::new(config.snapshot(), probe))
//!         .build()
//!         .await?;
//!
//!     server.run_stdio().await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod handlers;
pub mod probe;
pub mod registry;
pub mod server;
pub mod tools;

pub use builder::*;
pub use handlers::*;
pub use probe::*;
pub use registry::*;
pub use server::*;

/// Common imports for MCP server development
pub mod prelude {
    pub use crate::builder::*;
    pub use crate::handlers::*;
    pub use crate::probe::*;
    pub use crate::registry::*;
    pub use crate::server::*;
    pub use crate::tools::*;
    pub use storefront_core::prelude::*;

    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
}
