// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use erpnext_client::config::{ENV_API_KEY, ENV_API_SECRET, ENV_URL};
use erpnext_client::{ClientConfig, ErpNextClient};
use erpnext_mcp::McpServer;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "erpnext-mcp")]
#[command(about = "MCP server for ERPNext documents, listings and reports", long_about = None)]
struct Args {
    /// Base URL of the ERPNext site
    #[arg(long, env = ENV_URL)]
    url: Option<String>,

    /// API key for token authentication
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    api_key: Option<String>,

    /// API secret for token authentication
    #[arg(long, env = ENV_API_SECRET, hide_env_values = true)]
    api_secret: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, env = "ERPNEXT_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erpnext_mcp=info,erpnext_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let args = Args::parse();

    tracing::info!("ERPNext MCP Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = ClientConfig::new(args.url.unwrap_or_default(), args.api_key, args.api_secret)
        .context("Failed to configure ERPNext client")?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let client = ErpNextClient::new(config).context("Failed to create ERPNext client")?;
    tracing::info!(url = %client.base_url(), "Using ERPNext site");
    if !client.is_authenticated() {
        tracing::warn!(
            "{} and {} not both set; resource reads and tool calls will be refused",
            ENV_API_KEY,
            ENV_API_SECRET
        );
    }

    let server = McpServer::new(Arc::new(client));
    tracing::info!("Registered {} tools", server.registry().len());

    server.run_stdio().await?;

    Ok(())
}
