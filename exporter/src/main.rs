//! Syncwatch Exporter Binary
//!
//! Entry point for the Syncwatch mirror-staleness exporter.

#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = exporter::Cli::parse();
    exporter::run(cli).await
}
