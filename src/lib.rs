//! New-machine bootstrap engine.
//!
//! Installs the Homebrew formulae and casks listed in the dotfiles checkout,
//! then links every directory under `<dotfiles>/config` into `~/.config`.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: resolve paths and read package lists and `bootstrap.toml`
//! - **[`resources`]**: idempotent `check + apply` primitives (packages, symlinks)
//! - **[`tasks`]**: named units of work wired to resources
//! - **[`commands`]**: top-level orchestration of the restore sequence
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod resources;
pub mod tasks;
