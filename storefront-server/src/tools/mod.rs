//! Tools shipped with the Storefront MCP server

pub mod system_stats;

pub use system_stats::{CapabilityReport, DatabaseStatus, SystemStatsTool};
