mod cli;
mod logger;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    cli::profile_command(cli)
}
