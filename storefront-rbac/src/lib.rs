//! Role-based access control for Storefront
//!
//! The central piece is [`RoleGate`](gate::RoleGate): a reusable check that
//! admits an authenticated [`Principal`](principal::Principal) holding at
//! least one of a list of roles. Gates are grouped by route group in a
//! [`GateRegistry`](config::GateRegistry), loaded from [`GateConfig`](config::GateConfig).
//!
//! # Outcomes
//!
//! - no principal: `GateError::Unauthenticated` (401)
//! - principal without any listed role: `GateError::Unauthorized` (403)
//! - otherwise the protected handler runs
//!
//! # Quick Start
//!
//! ```rust
//! use storefront_rbac::prelude::*;
//!
//! # fn main() -> std::result::Result<(), RbacError> {
//! let config = GateConfig::default().with_group(RouteGroupConfig::new(
//!     "products.manage",
//!     RoleRequirement::any_of(["admin"]),
//! ));
//! let registry = GateRegistry::from_config(&config)?;
//!
//! let user = Principal::new("12").with_role("user");
//! let err = registry.gate("products.manage")?.check(Some(&user)).unwrap_err();
//! assert_eq!(err.to_string(), "Unauthorized. Required roles: admin");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod principal;
pub mod requirement;

pub mod prelude {
    //! Common imports for Storefront RBAC

    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::gate::RoleGate;
    pub use crate::principal::Principal;
    pub use crate::requirement::RoleRequirement;
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, error::RbacError>;
