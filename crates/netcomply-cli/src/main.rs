//! netcomply
//!
//! Command-line authoring for network compliance rules: validate YAML rule
//! bundles locally and apply them to the compliance API.

use anyhow::Result;
use clap::Parser;
use netcomply_client::ClientConfig;
use tracing::debug;

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = ClientConfig::load(&cli.config)?.with_api_url(cli.api_url.clone());
    debug!(api_url = %config.api_url, timeout_secs = config.timeout_secs, "Configuration loaded");

    commands::run(cli.command, &config).await
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("netcomply=debug,netcomply_rules=debug,netcomply_client=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("netcomply=info,netcomply_rules=info,netcomply_client=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
