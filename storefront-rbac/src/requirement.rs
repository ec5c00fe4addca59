//! Role requirements attached to route groups

use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered list of acceptable roles. Holding any one of them is enough.
///
/// Order is kept only so rejections list the roles the way they were
/// declared. An empty requirement admits every authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRequirement(Vec<String>);

impl RoleRequirement {
    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// Requirement satisfied by any authenticated principal
    pub fn authenticated() -> Self {
        Self(Vec::new())
    }

    pub fn roles(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_satisfied_by(&self, principal: &Principal) -> bool {
        self.is_empty() || principal.has_any_role(self.0.as_slice())
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<Vec<String>> for RoleRequirement {
    fn from(roles: Vec<String>) -> Self {
        Self(roles)
    }
}

impl From<&[&str]> for RoleRequirement {
    fn from(roles: &[&str]) -> Self {
        Self::any_of(roles.iter().copied())
    }
}
