//! SQL Gateway MCP Server - Main entry point.
//!
//! Validates the connection profile, connects the engine-appropriate
//! executor, and serves the MCP tools over the selected transport.

use clap::Parser;
use sql_gateway_mcp::config::{Config, TransportMode};
use sql_gateway_mcp::db;
use sql_gateway_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    let profile = match config.connection_profile() {
        Ok(profile) => Arc::new(profile),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Usage: sql-gateway-mcp --client <engine> --host <host> --database <name>");
            eprintln!("       sql-gateway-mcp --client sqlite --filename <path>");
            eprintln!("       sql-gateway-mcp --connection-string <url>");
            eprintln!();
            eprintln!("Environment: DB_CLIENT, DB_HOST, DB_PORT, DB_USER, DB_PASSWORD,");
            eprintln!("             DB_NAME, DB_FILENAME, DB_CONNECTION_STRING, DB_READONLY,");
            eprintln!("             DB_POOL_MIN, DB_POOL_MAX");
            std::process::exit(1);
        }
    };

    info!(
        transport = %config.transport,
        "Starting SQL Gateway MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let executor = match db::connect(&profile).await {
        Ok(executor) => executor,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            return Err(e.into());
        }
    };

    info!(
        engine = %profile.engine,
        database = %profile.database_label(),
        read_only = profile.read_only,
        "Connected to database"
    );

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(executor, profile);
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                executor,
                profile,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
