use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Version string baked in by `build.rs`, falling back to the crate version.
pub const VERSION: &str = match option_env!("BOOTSTRAP_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Install Homebrew packages and link config directories on a new machine.
#[derive(Parser, Debug)]
#[command(name = "bootstrap", version = VERSION)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Override dotfiles root directory (default: $DOTFILES_ROOT or ~/Workspace/dotfiles)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Override the directory receiving config links (default: ~/.config)
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Skip whole stages
    #[arg(long, value_enum, value_delimiter = ',')]
    pub skip: Vec<Stage>,
}

/// A stage that can be left out with `--skip`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Formula and cask installation.
    Packages,
    /// Config directory linking.
    Links,
}
