//! `system_stats`: runtime and environment facts for MCP clients
//!
//! The report is rebuilt on every call from an injected [`ConfigSnapshot`]
//! and a fresh datastore probe. A datastore that is down or unconfigured is
//! reported inside `database_status`; the call itself still succeeds.

use crate::handlers::ToolHandler;
use crate::probe::{ConnectionInfo, DatastoreProbe, ProbeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use storefront_core::prelude::*;
use tracing::{instrument, warn};

pub const TOOL_NAME: &str = "system_stats";

pub const TOOL_DESCRIPTION: &str = "Get system information including runtime version, interpreter version, and database connection status";

const DEFAULT_ENVIRONMENT: &str = "production";
const DEFAULT_TIMEZONE: &str = "UTC";
const UNKNOWN_VERSION: &str = "unknown";

/// Datastore reachability as reported to clients.
///
/// `connected == false` always comes with `driver` and `database` unset and
/// `error` set; `connected == true` never carries an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub driver: Option<String>,
    pub database: Option<String>,
    pub error: Option<String>,
}

impl DatabaseStatus {
    pub fn connected(info: ConnectionInfo) -> Self {
        Self {
            connected: true,
            driver: Some(info.driver),
            database: Some(info.database),
            error: None,
        }
    }

    pub fn failed(error: &ProbeError) -> Self {
        Self {
            connected: false,
            driver: None,
            database: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<std::result::Result<ConnectionInfo, ProbeError>> for DatabaseStatus {
    fn from(result: std::result::Result<ConnectionInfo, ProbeError>) -> Self {
        match result {
            Ok(info) => Self::connected(info),
            Err(e) => Self::failed(&e),
        }
    }
}

/// The six keys every `system_stats` call returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    pub runtime_version: String,
    pub interpreter_version: String,
    pub database_status: DatabaseStatus,
    pub environment: String,
    pub debug_mode: bool,
    pub timezone: String,
}

/// Handler for the `system_stats` tool
pub struct SystemStatsTool {
    snapshot: ConfigSnapshot,
    probe: Arc<dyn DatastoreProbe>,
}

impl SystemStatsTool {
    pub fn new(snapshot: ConfigSnapshot, probe: Arc<dyn DatastoreProbe>) -> Self {
        Self { snapshot, probe }
    }

    /// Build a fresh report. Never fails.
    pub async fn report(&self) -> CapabilityReport {
        let probed = self.probe.probe().await;
        if let Err(e) = &probed {
            warn!(error = %e, "Datastore probe failed");
        }
        let database_status = DatabaseStatus::from(probed);

        let snapshot = &self.snapshot;
        CapabilityReport {
            runtime_version: snapshot.runtime_version.clone(),
            interpreter_version: snapshot
                .interpreter_version
                .clone()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            database_status,
            environment: snapshot
                .environment
                .clone()
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            debug_mode: snapshot.debug_mode,
            timezone: snapshot
                .timezone
                .clone()
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        }
    }

    pub fn input_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }
}

#[async_trait]
impl ToolHandler for SystemStatsTool {
    async fn tool(&self) -> Tool {
        Tool::new(TOOL_NAME, Self::input_schema()).with_description(TOOL_DESCRIPTION)
    }

    /// Arguments are accepted and ignored.
    #[instrument(name = "system_stats", skip_all)]
    async fn call(&self, _arguments: Option<serde_json::Value>) -> Result<ToolsCallResponse> {
        let report = self.report().await;
        ToolsCallResponse::structured(serde_json::to_value(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(std::result::Result<ConnectionInfo, ProbeError>);

    #[async_trait]
    impl DatastoreProbe for FixedProbe {
        async fn probe(&self) -> std::result::Result<ConnectionInfo, ProbeError> {
            self.0.clone()
        }
    }

    fn snapshot() -> ConfigSnapshot {
        ConfigSnapshot {
            runtime_version: "0.1.0".to_string(),
            interpreter_version: Some("rustc 1.85.0".to_string()),
            environment: Some("local".to_string()),
            debug_mode: true,
            timezone: Some("Europe/Berlin".to_string()),
        }
    }

    #[tokio::test]
    async fn test_report_copies_snapshot() {
        let probe = Arc::new(FixedProbe(Ok(ConnectionInfo {
            driver: "mysql".to_string(),
            database: "shop".to_string(),
        })));
        let report = SystemStatsTool::new(snapshot(), probe).report().await;

        assert_eq!(report.runtime_version, "0.1.0");
        assert_eq!(report.interpreter_version, "rustc 1.85.0");
        assert_eq!(report.environment, "local");
        assert!(report.debug_mode);
        assert_eq!(report.timezone, "Europe/Berlin");
        assert_eq!(report.database_status.driver.as_deref(), Some("mysql"));
        assert!(report.database_status.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_settings_use_defaults() {
        let snapshot = ConfigSnapshot {
            runtime_version: "0.1.0".to_string(),
            interpreter_version: None,
            environment: None,
            debug_mode: false,
            timezone: None,
        };
        let probe = Arc::new(FixedProbe(Err(ProbeError::NotConfigured)));
        let report = SystemStatsTool::new(snapshot, probe).report().await;

        assert_eq!(report.interpreter_version, "unknown");
        assert_eq!(report.environment, "production");
        assert_eq!(report.timezone, "UTC");
        assert!(!report.database_status.connected);
        assert!(report.database_status.driver.is_none());
        assert!(report.database_status.database.is_none());
        assert!(report.database_status.error.is_some());
    }

    #[tokio::test]
    async fn test_null_fields_serialize_as_null() {
        let status = DatabaseStatus::from(Err(ProbeError::NotConfigured));
        let value = serde_json::to_value(status).unwrap();
        assert!(value["driver"].is_null());
        assert!(value["database"].is_null());
        assert_eq!(value["error"], "No database connection configured");
    }

    #[tokio::test]
    async fn test_tool_metadata() {
        let probe = Arc::new(FixedProbe(Err(ProbeError::NotConfigured)));
        let tool = SystemStatsTool::new(snapshot(), probe).tool().await;

        assert_eq!(tool.name, "system_stats");
        assert_eq!(tool.description.as_deref(), Some(TOOL_DESCRIPTION));
        assert_eq!(tool.input_schema["required"], json!([]));
    }
}
