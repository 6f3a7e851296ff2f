//! Install every package named in a list file.
use std::collections::HashSet;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::{PackageKind, packages};
use crate::resources::package::{PackageResource, get_installed_packages};
use crate::resources::{Applicable, ResourceState};

/// Runs `<manager> install [--cask] <name>` once per listed package.
#[derive(Debug, Clone, Copy)]
pub struct InstallPackages {
    kind: PackageKind,
}

impl InstallPackages {
    /// Installer for the list of the given kind.
    #[must_use]
    pub const fn new(kind: PackageKind) -> Self {
        Self { kind }
    }
}

impl Task for InstallPackages {
    fn name(&self) -> &str {
        match self.kind {
            PackageKind::Formula => "Install formulae",
            PackageKind::Cask => "Install casks",
        }
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = ctx.config.package_list(self.kind);
        let names = match packages::load(&path) {
            Ok(names) => names,
            Err(e) => {
                ctx.log.warn(&format!("{e}; skipping {} installs", self.kind));
                let reason = if e.is_not_found() {
                    "package list not found"
                } else {
                    "package list unreadable"
                };
                return Ok(TaskResult::Skipped(reason.to_string()));
            }
        };
        ctx.log.debug(&format!(
            "{} {} entries in {}",
            names.len(),
            self.kind,
            path.display()
        ));

        let manager = ctx.package_manager();
        let mut installed: Option<HashSet<String>> = None;
        let mut stats = TaskStats::new();

        for name in names {
            let resource = PackageResource::new(name, self.kind, manager, ctx.executor.as_ref());

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would install {}: {}", self.kind, resource.name));
                stats.changed += 1;
                continue;
            }

            ctx.log
                .info(&format!("installing {}: {}", self.kind, resource.name));
            match resource.apply() {
                Ok(_) => stats.changed += 1,
                Err(e) => {
                    // Queried at most once per list, and only after a failure.
                    let known = installed.get_or_insert_with(|| {
                        get_installed_packages(manager, self.kind, ctx.executor.as_ref())
                            .unwrap_or_else(|err| {
                                ctx.log
                                    .debug(&format!("could not list installed packages: {err:#}"));
                                HashSet::new()
                            })
                    });
                    if resource.state_from_installed(known) == ResourceState::Correct {
                        ctx.log.warn(&format!(
                            "{} reported a failure but is already installed",
                            resource.description()
                        ));
                        stats.already_ok += 1;
                    } else {
                        ctx.log.error(&format!(
                            "failed to install {}: {e:#}",
                            resource.description()
                        ));
                        stats.failed += 1;
                    }
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}
