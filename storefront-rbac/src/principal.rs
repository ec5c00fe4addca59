//! Authenticated callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The identity attached to a request after authentication.
///
/// Role names are compared exactly; `"Admin"` and `"admin"` are different
/// roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    #[serde(default)]
    roles: BTreeSet<String>,
}

impl Principal {
    /// Create a principal with no roles
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: BTreeSet::new(),
        }
    }

    /// Add a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add several roles
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True when the principal holds at least one of `roles`.
    ///
    /// An empty list yields `false`; callers that treat "no roles required"
    /// as open go through [`RoleRequirement::is_satisfied_by`](crate::requirement::RoleRequirement::is_satisfied_by).
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal:{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_any_role() {
        let principal = Principal::new("42").with_roles(["user", "editor"]);

        assert!(principal.has_any_role(&["admin", "editor"]));
        assert!(!principal.has_any_role(&["admin"]));
        assert!(!principal.has_any_role::<&str>(&[]));
    }

    #[test]
    fn test_role_names_are_case_sensitive() {
        let principal = Principal::new("7").with_role("Admin");
        assert!(!principal.has_role("admin"));
        assert!(principal.has_role("Admin"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Principal::new("abc").to_string(), "principal:abc");
    }
}
