mod bootstrap;
mod cli;
mod commands;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::resolve_config(cli.config.as_deref())?;

    if let Err(e) = bootstrap::init_tracing_subscriber(&config.logs_dir()) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    commands::dispatch(cli.command, config).await
}
