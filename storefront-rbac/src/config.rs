//! Route-group configuration
//!
//! Route groups name a set of endpoints that share one role requirement,
//! e.g. `products.manage`. The mapping is loaded once at startup and
//! validated before any gate is built.

use crate::error::RbacError;
use crate::gate::RoleGate;
use crate::requirement::RoleRequirement;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// Route-group to role mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub groups: Vec<RouteGroupConfig>,
}

/// One route group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGroupConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Acceptable roles; empty means any authenticated principal
    #[serde(default)]
    pub roles: RoleRequirement,
}

impl RouteGroupConfig {
    pub fn new(name: impl Into<String>, roles: RoleRequirement) -> Self {
        Self {
            name: name.into(),
            description: None,
            roles,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl GateConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RbacError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RbacError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: GateConfig = serde_json::from_str(&content)
            .map_err(|e| RbacError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), RbacError> {
        let content = serde_json::to_string_pretty(self)?;

        std::fs::write(path.as_ref(), content).map_err(|e| {
            RbacError::Configuration(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    pub fn with_group(mut self, group: RouteGroupConfig) -> Self {
        self.groups.push(group);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RbacError> {
        let mut names = HashSet::new();
        for group in &self.groups {
            if group.name.trim().is_empty() {
                return Err(RbacError::Configuration(
                    "Route group name must not be blank".to_string(),
                ));
            }
            if !names.insert(group.name.as_str()) {
                return Err(RbacError::DuplicateRouteGroup(group.name.clone()));
            }
            if group.roles.roles().iter().any(|r| r.trim().is_empty()) {
                return Err(RbacError::Configuration(format!(
                    "Route group '{}' lists a blank role",
                    group.name
                )));
            }
        }
        Ok(())
    }
}

/// Gates keyed by route group, built once at startup
#[derive(Debug, Clone, Default)]
pub struct GateRegistry {
    gates: HashMap<String, RoleGate>,
}

impl GateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from validated configuration
    pub fn from_config(config: &GateConfig) -> Result<Self, RbacError> {
        config.validate()?;

        let mut registry = Self::new();
        for group in &config.groups {
            registry.register(group.name.clone(), RoleGate::new(group.roles.clone()))?;
        }
        info!(groups = registry.gates.len(), "Route-group gates loaded");
        Ok(registry)
    }

    pub fn register(&mut self, group: impl Into<String>, gate: RoleGate) -> Result<(), RbacError> {
        let group = group.into();
        if self.gates.contains_key(&group) {
            return Err(RbacError::DuplicateRouteGroup(group));
        }
        self.gates.insert(group, gate);
        Ok(())
    }

    /// Gate for `group`; unknown groups are a configuration mistake
    pub fn gate(&self, group: &str) -> Result<&RoleGate, RbacError> {
        self.gates
            .get(group)
            .ok_or_else(|| RbacError::UnknownRouteGroup(group.to_string()))
    }

    /// Registered group names, sorted
    pub fn groups(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
