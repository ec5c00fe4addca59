//! Storefront service
//!
//! ```text
//! storefront-app [serve|stdio] [--config <app.json>] [--gates <gates.json>]
//! ```
//!
//! `serve` (the default) exposes the REST API and `POST /mcp` on the
//! configured HTTP address. `stdio` runs only the MCP server over
//! stdin/stdout, for agents that spawn the process.
//!
//! `STOREFRONT_ADMIN_EMAIL` and `STOREFRONT_ADMIN_PASSWORD`, when both set,
//! seed an administrator account at startup.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use storefront_api::identity::{InMemoryIdentityProvider, Registration};
use storefront_api::products::ProductStore;
use storefront_api::{ApiState, default_gate_config};
use storefront_core::config::AppConfig;
use storefront_rbac::config::{GateConfig, GateRegistry};
use storefront_server::prelude::{McpServer, McpServerBuilder, SystemStatsTool, TcpDatastoreProbe};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Storefront REST API and MCP server.
#[derive(Parser, Debug)]
#[command(name = "storefront-app", version, long_about = None)]
struct Args {
    /// Application config file (JSON), applied before environment overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Route-group role config (JSON).
    #[arg(long, global = true)]
    gates: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand, Debug, Default, PartialEq, Eq)]
enum Mode {
    /// REST API and `POST /mcp` over HTTP
    #[default]
    Serve,
    /// MCP over stdin/stdout only
    Stdio,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries MCP frames in stdio mode, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;

    let mcp = Arc::new(build_mcp_server(&config).await?);

    match args.command.unwrap_or_default() {
        Mode::Stdio => {
            mcp.run_stdio().await?;
        }
        Mode::Serve => {
            let gates = match &args.gates {
                Some(path) => GateConfig::from_file(path)
                    .with_context(|| format!("loading gate config {}", path.display()))?,
                None => default_gate_config(),
            };
            let gates = GateRegistry::from_config(&gates)?;

            let identity = Arc::new(InMemoryIdentityProvider::from_settings(&config.auth));
            seed_admin(&identity).await?;
            let state = ApiState::new(identity, Arc::new(ProductStore::new()), Arc::new(gates));

            let app = storefront_api::router(state)?.merge(mcp.clone().router());
            let addr = config.http.socket_addr();
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(%addr, "Storefront listening");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    info!("Storefront stopped");
    Ok(())
}

async fn build_mcp_server(config: &AppConfig) -> Result<McpServer> {
    let probe = Arc::new(TcpDatastoreProbe::from_settings(&config.database));
    let server = McpServerBuilder::from_settings(&config.mcp)
        .with_tool(SystemStatsTool::new(config.snapshot(), probe))
        .build()
        .await?;
    info!(name = %server.info().name, version = %server.info().version, "MCP server ready");
    Ok(server)
}

async fn seed_admin(identity: &InMemoryIdentityProvider) -> Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("STOREFRONT_ADMIN_EMAIL"),
        std::env::var("STOREFRONT_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let registration = Registration {
        name: "Administrator".to_string(),
        email,
        password,
    };
    let admin = identity
        .create_user(registration, ["admin"])
        .await
        .context("seeding administrator")?;
    info!(user_id = %admin.id, "Administrator account seeded");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("storefront-app").chain(list.iter().copied()))
    }

    #[test]
    fn default_mode_is_serve() {
        assert_eq!(args(&[]).unwrap().command.unwrap_or_default(), Mode::Serve);
    }

    #[test]
    fn stdio_with_config() {
        let parsed = args(&["stdio", "--config", "app.json"]).unwrap();
        assert_eq!(parsed.command, Some(Mode::Stdio));
        assert_eq!(parsed.config, Some(PathBuf::from("app.json")));
    }

    #[test]
    fn gates_before_subcommand() {
        let parsed = args(&["--gates", "gates.json", "serve"]).unwrap();
        assert_eq!(parsed.command, Some(Mode::Serve));
        assert_eq!(parsed.gates, Some(PathBuf::from("gates.json")));
    }

    #[test]
    fn unknown_argument_rejected() {
        assert!(args(&["--verbose"]).is_err());
        assert!(args(&["--gates"]).is_err());
        assert!(args(&["migrate"]).is_err());
    }
}
