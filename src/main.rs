use anyhow::Result;
use clap::Parser;
use job_market::cli::{self, Cli};
use job_market::core::ConfigManager;
use job_market::log::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Logging needs the configured log file, so configuration comes first
    let config = ConfigManager::load(args.config.as_deref())?;
    init_tracing(config.log_file.as_deref())?;

    cli::run(args.command, config).await
}
