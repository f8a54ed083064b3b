//! pdf-tools-http - HTTP API entry point

use clap::Parser;
use pdf_page_tools::{http, logging, Config};

/// Command-line overrides for the HTTP server
#[derive(Parser, Debug)]
#[command(name = "pdf-tools-http")]
#[command(about = "HTTP API for splitting, compressing and removing pages from PDFs")]
#[command(version)]
struct Args {
    /// Host address to bind to (overrides HTTP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides HTTP_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    if args.verbose {
        config.log.level = "debug".to_string();
    }
    logging::init(&config.log);

    tracing::info!(
        validation = ?config.pdf.validation_mode,
        "Starting PDF tools HTTP server"
    );

    http::serve(config.pdf, config.http).await
}
