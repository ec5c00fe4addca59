//! # Storefront Core
//!
//! Shared building blocks for the Storefront crates: the error type, the
//! JSON-RPC and Model Context Protocol wire types, and layered application
//! configuration.
//!
//! ## API Stability
//!
//! **Current Status: EXPERIMENTAL (v0.x.x)**. Minor version bumps may include
//! breaking changes until 1.0.0.

#![warn(missing_docs)]

#[allow(missing_docs)]
pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ConfigSnapshot};
pub use error::{Error, Result};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AppConfig, ConfigSnapshot};
    pub use crate::error::{Error, ProtocolError, Result};
    pub use crate::types::*;
}
