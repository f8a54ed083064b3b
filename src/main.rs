//! PDF tools MCP server - Entry point
//!
//! Speaks the Model Context Protocol over stdio. Logs go to stderr.

use pdf_page_tools::{logging, run_server, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logging::init(&config.log);

    tracing::info!("Starting PDF tools MCP server");

    run_server(config.pdf, config.mcp).await
}
