//! Command: install packages, then link configs into place.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{Cli, Stage, VERSION};
use crate::config::{Config, Layout, PackageKind};
use crate::error::BootstrapError;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger, TaskStatus};
use crate::tasks::packages::InstallPackages;
use crate::tasks::symlinks::LinkConfigs;
use crate::tasks::{Context, Task};

use super::run_tasks_to_completion;

/// Printed when `brew` is not on `PATH`.
const BREW_REMEDIATION: &str = "Please install Homebrew first by visiting https://brew.sh/";

/// Summary row for the setup that precedes the tasks.
const SETUP_TASK: &str = "Load configuration";

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved, `bootstrap.toml`
/// is malformed, or a task hits a fatal condition.
pub fn run(cli: &Cli, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("bootstrap {VERSION}"));

    let config = load_config(Layout::from_env(cli.root.clone(), cli.target.clone()), log)?;
    let ctx = Context::new(
        Arc::new(config),
        Arc::clone(log) as Arc<dyn Log>,
        cli.dry_run,
        Arc::new(SystemExecutor),
    );

    run_with(&ctx, &cli.skip, log)
}

/// Load settings for a resolved layout.
///
/// A fatal error is logged, recorded as a failed setup row and summarised
/// before it is returned, so it reaches the log file like task failures do.
///
/// # Errors
///
/// Returns the layout error, or [`BootstrapError::Settings`] for a bad
/// `bootstrap.toml`.
pub fn load_config(layout: Result<Layout, BootstrapError>, log: &Logger) -> Result<Config> {
    let loaded = layout.and_then(|layout| {
        log.debug(&format!("home: {}", layout.home.display()));
        log.debug(&format!("dotfiles root: {}", layout.root.display()));
        log.debug(&format!("config destination: {}", layout.config_dest.display()));
        Config::load(layout)
    });

    loaded.map_err(|e| {
        let message = e.to_string();
        log.error(&message);
        log.record_task(SETUP_TASK, TaskStatus::Failed, Some(&message));
        log.print_summary();
        e.into()
    })
}

/// The restore sequence in execution order, each task tagged with the stage
/// `--skip` knows it by.
#[must_use]
pub fn restore_tasks() -> Vec<(Stage, Box<dyn Task>)> {
    let formulae: Box<dyn Task> = Box::new(InstallPackages::new(PackageKind::Formula));
    let casks: Box<dyn Task> = Box::new(InstallPackages::new(PackageKind::Cask));
    let links: Box<dyn Task> = Box::new(LinkConfigs);
    vec![
        (Stage::Packages, formulae),
        (Stage::Packages, casks),
        (Stage::Links, links),
    ]
}

/// Run the restore sequence against an already-built context.
///
/// Package tasks are skipped as a group when the package manager is missing;
/// linking still runs.
///
/// # Errors
///
/// Returns the first fatal task error.
pub fn run_with(ctx: &Context, skip: &[Stage], log: &Logger) -> Result<()> {
    let manager = ctx.package_manager();
    let manager_found = skip.contains(&Stage::Packages) || ctx.executor.which(manager);
    if !manager_found {
        ctx.log
            .warn(&format!("{manager} not found in PATH; skipping package installation"));
        if manager == "brew" {
            ctx.log.warn(BREW_REMEDIATION);
        } else {
            ctx.log.warn(&format!(
                "Please install {manager} or set package_manager in bootstrap.toml"
            ));
        }
    }

    let all_tasks = restore_tasks();
    let mut selected: Vec<&dyn Task> = Vec::new();
    for (stage, task) in &all_tasks {
        if skip.contains(stage) {
            let reason = match stage {
                Stage::Packages => "--skip packages",
                Stage::Links => "--skip links",
            };
            ctx.log
                .record_task(task.name(), TaskStatus::NotApplicable, Some(reason));
        } else if *stage == Stage::Packages && !manager_found {
            ctx.log.record_task(
                task.name(),
                TaskStatus::Skipped,
                Some(&format!("{manager} not found")),
            );
        } else {
            selected.push(task.as_ref());
        }
    }

    run_tasks_to_completion(selected, ctx, log, "Restore complete")
}
