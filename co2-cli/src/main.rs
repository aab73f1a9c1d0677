//! CO2 CLI - Command line tool for building chart data from emissions datasets.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "co2-cli",
    version,
    about = "CO2 emissions chart-data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: co2_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("co2-cli {}", env!("CARGO_PKG_VERSION"));
    co2_cmd::run(cli.command)
}
