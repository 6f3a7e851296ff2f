//! Package installation resource.
use std::collections::HashSet;

use anyhow::Result;

use super::error::ResourceError;
use super::{Applicable, ResourceChange, ResourceState};
use crate::config::PackageKind;
use crate::exec::Executor;

/// A Homebrew formula or cask to install.
#[derive(Debug)]
pub struct PackageResource<'a> {
    /// Package name as written in the list file.
    pub name: String,
    /// Formula or cask.
    pub kind: PackageKind,
    /// Package manager executable.
    manager: &'a str,
    /// Executor for running package manager commands.
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(
        name: String,
        kind: PackageKind,
        manager: &'a str,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            name,
            kind,
            manager,
            executor,
        }
    }

    /// Arguments passed to the package manager: `install [--cask] <name>`.
    #[must_use]
    pub fn install_args(&self) -> Vec<&str> {
        let mut args = vec!["install"];
        if self.kind == PackageKind::Cask {
            args.push("--cask");
        }
        args.push(&self.name);
        args
    }

    /// Determine the resource state from a pre-fetched set of installed names.
    #[must_use]
    pub fn state_from_installed(&self, installed: &HashSet<String>) -> ResourceState {
        if installed.contains(&self.name) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        }
    }
}

/// Query the names of all installed packages of `kind`.
///
/// Runs a single `<manager> list --formula -1` (or `--cask`) with captured
/// output.  A non-zero exit yields an empty set.
///
/// # Errors
///
/// Returns an error if the command cannot be spawned.
pub fn get_installed_packages(
    manager: &str,
    kind: PackageKind,
    executor: &dyn Executor,
) -> Result<HashSet<String>> {
    let kind_flag = match kind {
        PackageKind::Formula => "--formula",
        PackageKind::Cask => "--cask",
    };
    let result = executor.run_unchecked(manager, &["list", kind_flag, "-1"])?;
    let mut set = HashSet::new();
    if result.success {
        for line in result.stdout.lines() {
            if let Some(name) = line.split_whitespace().next() {
                set.insert(name.to_string());
            }
        }
    }
    Ok(set)
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let args = self.install_args();
        let result = self.executor.run_inherited(self.manager, &args)?;
        if !result.success {
            return Err(ResourceError::ExecutionFailed {
                command: format!("{} {}", self.manager, args.join(" ")),
                exit_code: result.code,
            }
            .into());
        }
        Ok(ResourceChange::Applied)
    }
}
