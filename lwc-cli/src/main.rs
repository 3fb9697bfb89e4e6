//! LWC CLI - Command line tool for layer collage statistics.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "lwc-cli",
    version,
    about = "Layer collage statistics over time-series events"
)]
struct Cli {
    #[command(subcommand)]
    command: lwc_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("lwc-cli {}", env!("CARGO_PKG_VERSION"));
    lwc_cmd::run(cli.command)
}
