//! Poppler MCP Server - Entry point
//!
//! Set `POPPLER_BIN_DIR` to the directory holding the poppler binaries and
//! optionally `PDF_RESOURCE_DIRS` (a path list) to restrict file access.

use poppler_mcp_server::{run_server_with_config, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poppler_mcp_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let binary_dir = std::env::var_os("POPPLER_BIN_DIR").map(PathBuf::from);
    let resource_dirs: Vec<String> = std::env::var_os("PDF_RESOURCE_DIRS")
        .map(|dirs| {
            std::env::split_paths(&dirs)
                .map(|dir| dir.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    tracing::info!(
        binary_dir = ?binary_dir,
        resource_dirs = ?resource_dirs,
        "Starting Poppler MCP Server"
    );

    run_server_with_config(ServerConfig {
        binary_dir,
        resource_dirs,
    })
    .await
}
