use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotfiles_bootstrap::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "restore");
    let log = Arc::new(logging::Logger::new("restore"));

    commands::restore::run(&args, &log)
}
