use anyhow::Context;
use clap::Parser;
use tracing::debug;

use depthrace::adapter::inbound::cli::command::Cli;
use depthrace::adapter::inbound::cli::output::{self, OutputConfig};
use depthrace::adapter::inbound::cli::run;
use depthrace::infrastructure::config::settings::Config;

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = try_main(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.init_logging();
    debug!(config = %cli.config.display(), "configuration loaded");

    run(&cli.command, &config)?;
    Ok(())
}
