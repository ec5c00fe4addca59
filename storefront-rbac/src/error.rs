//! Error types for Storefront RBAC

use thiserror::Error;

/// Why the role gate refused a request.
///
/// The display strings are what the caller sees in rejection bodies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No principal is attached to the request.
    #[error("Unauthenticated.")]
    Unauthenticated,

    /// The principal holds none of the acceptable roles.
    #[error("Unauthorized. Required roles: {}", .required.join(", "))]
    Unauthorized {
        /// Roles any one of which would have satisfied the gate
        required: Vec<String>,
    },
}

impl GateError {
    /// HTTP status equivalent: 401 or 403
    pub fn status_code(&self) -> u16 {
        match self {
            GateError::Unauthenticated => 401,
            GateError::Unauthorized { .. } => 403,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            GateError::Unauthenticated => "UNAUTHENTICATED",
            GateError::Unauthorized { .. } => "FORBIDDEN",
        }
    }

    /// Acceptable roles; empty for `Unauthenticated`
    pub fn required_roles(&self) -> &[String] {
        match self {
            GateError::Unauthenticated => &[],
            GateError::Unauthorized { required } => required,
        }
    }
}

/// Errors raised while building the route-group registry
#[derive(Error, Debug)]
pub enum RbacError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown route group: {0}")]
    UnknownRouteGroup(String),

    #[error("Duplicate route group: {0}")]
    DuplicateRouteGroup(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
