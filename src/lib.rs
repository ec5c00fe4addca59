//! # Storefront
//!
//! Product catalogue service with role-gated management routes and an MCP
//! diagnostics tool.
//!
//! This crate re-exports the constituent crates:
//! - `storefront-core`: errors, JSON-RPC/MCP types and configuration
//! - `storefront-rbac`: principals, role requirements and the role gate
//! - `storefront-server`: MCP server with the `system_stats` tool
//! - `storefront-api`: REST surface (auth and products)

pub use storefront_api as api;
pub use storefront_core as core;
pub use storefront_rbac as rbac;
pub use storefront_server as server;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::api::{ApiError, ApiState, PRODUCTS_MANAGE, default_gate_config, router};
    pub use crate::rbac::prelude::*;
    pub use crate::server::prelude::*;
}
