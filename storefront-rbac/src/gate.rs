//! The role gate
//!
//! A [`RoleGate`] sits in front of a handler and lets a request through only
//! when the caller is authenticated and holds at least one acceptable role.
//! Rejections are logged at `warn`, admissions at `debug`.
//!
//! ```rust
//! use storefront_rbac::prelude::*;
//!
//! let gate = RoleGate::any_of(["admin", "editor"]);
//! let editor = Principal::new("7").with_role("editor");
//!
//! assert!(gate.check(Some(&editor)).is_ok());
//! assert_eq!(gate.check(None).unwrap_err().status_code(), 401);
//! ```

use crate::error::GateError;
use crate::principal::Principal;
use crate::requirement::RoleRequirement;
use std::future::Future;
use tracing::{debug, warn};

/// Guards a handler behind an "any of these roles" requirement
#[derive(Debug, Clone, Default)]
pub struct RoleGate {
    requirement: RoleRequirement,
}

impl RoleGate {
    pub fn new(requirement: RoleRequirement) -> Self {
        Self { requirement }
    }

    /// Gate admitting principals holding any of `roles`
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(RoleRequirement::any_of(roles))
    }

    /// Gate admitting every authenticated principal
    pub fn authenticated() -> Self {
        Self::new(RoleRequirement::authenticated())
    }

    pub fn requirement(&self) -> &RoleRequirement {
        &self.requirement
    }

    /// Decide whether `principal` may pass.
    ///
    /// A missing principal is always `Unauthenticated`, even when the
    /// requirement is empty.
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), GateError> {
        let Some(principal) = principal else {
            warn!(required = %self.requirement, "Access denied: unauthenticated");
            return Err(GateError::Unauthenticated);
        };

        if self.requirement.is_satisfied_by(principal) {
            debug!(
                subject = %principal.id(),
                required = %self.requirement,
                "Access granted"
            );
            Ok(())
        } else {
            warn!(
                subject = %principal.id(),
                required = %self.requirement,
                "Access denied: missing role"
            );
            Err(GateError::Unauthorized {
                required: self.requirement.roles().to_vec(),
            })
        }
    }

    /// Run `next` only if [`check`](Self::check) passes.
    ///
    /// On rejection `next` is never polled, so the protected handler does
    /// not run.
    pub async fn guard<F, Fut, T>(&self, principal: Option<&Principal>, next: F) -> Result<T, GateError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.check(principal)?;
        Ok(next().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_admin_passes_admin_gate() {
        let gate = RoleGate::any_of(["admin"]);
        let admin = Principal::new("1").with_role("admin");
        assert!(gate.check(Some(&admin)).is_ok());
    }

    #[test]
    fn test_missing_role_is_forbidden() {
        let gate = RoleGate::any_of(["admin", "editor"]);
        let user = Principal::new("2").with_role("user");

        let err = gate.check(Some(&user)).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.required_roles(), ["admin", "editor"]);
    }

    #[test]
    fn test_empty_requirement_still_needs_principal() {
        let gate = RoleGate::authenticated();
        assert_eq!(gate.check(None), Err(GateError::Unauthenticated));
        assert!(gate.check(Some(&Principal::new("3"))).is_ok());
    }

    #[tokio::test]
    async fn test_guard_skips_handler_on_rejection() {
        let gate = RoleGate::any_of(["admin"]);
        let calls = AtomicUsize::new(0);
        let user = Principal::new("4").with_role("user");

        let result = gate
            .guard(Some(&user), || async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_guard_passes_handler_output_through() {
        let gate = RoleGate::any_of(["admin"]);
        let admin = Principal::new("5").with_role("admin");

        let value = gate.guard(Some(&admin), || async { 41 + 1 }).await;
        assert_eq!(value, Ok(42));
    }
}
