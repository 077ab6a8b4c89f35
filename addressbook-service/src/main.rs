use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use addressbook_service::prelude::*;

/// addressbook - address book REST service
#[derive(Parser)]
#[command(name = "addressbook")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard locations
    #[arg(short, long, env = "ADDRESSBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::load().context("loading configuration")?,
    };
    if let Some(port) = cli.port {
        config.service.port = port;
    }

    init_tracing(&config).context("initializing tracing")?;

    let repository = open_repository(&config)
        .await
        .context("opening the address store")?;

    let app = router(AppState::new(config.clone(), repository));

    Server::new(config)
        .serve(app)
        .await
        .context("running the HTTP server")?;

    Ok(())
}
