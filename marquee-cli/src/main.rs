//! Marquee CLI - Command-line interface
//!
//! Runs the trend tracker service and drives movie discovery from a terminal.

mod commands;

use anyhow::Context;
use clap::Parser;
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};
use marquee_core::{MarqueeConfig, RuntimeMode};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Movie discovery with trending searches")]
#[command(version)]
struct Cli {
    /// Runtime mode: production queries the metadata API, development uses a demo catalog
    #[arg(long, global = true, value_enum, default_value = "development")]
    mode: RuntimeMode,

    /// Console log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value = "info")]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), None)
        .context("failed to initialize tracing")?;

    let config = MarqueeConfig::from_env();
    commands::handle_command(cli.command, config, cli.mode).await
}
