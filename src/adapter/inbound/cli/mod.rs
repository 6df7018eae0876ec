//! CLI module graph and command dispatch.

pub mod command;
pub mod history;
pub mod output;
pub mod races;
pub mod simulate;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use command::Commands;

/// Run one parsed subcommand against the loaded configuration.
pub fn run(command: &Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Simulate(args) => simulate::execute(args, config),
        Commands::Races(args) => races::execute_races(args),
        Commands::BuildRaces(args) => races::execute_build(args, config),
        Commands::Activity(args) => races::execute_activity(args),
        Commands::History(args) => history::execute(args, config),
    }
}
