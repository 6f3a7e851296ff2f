//! Run configuration: resolved paths plus optional `bootstrap.toml` settings.
pub mod layout;
pub mod packages;
pub mod settings;
pub mod toml_loader;

use std::path::PathBuf;

use crate::error::BootstrapError;

pub use layout::Layout;
pub use packages::PackageKind;
pub use settings::Settings;

/// All configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved filesystem layout.
    pub layout: Layout,
    /// Names read from `bootstrap.toml` (or defaults).
    pub settings: Settings,
}

impl Config {
    /// Load settings from the layout's dotfiles root.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Settings`] if `bootstrap.toml` is malformed.
    pub fn load(layout: Layout) -> Result<Self, BootstrapError> {
        let settings = settings::load(&layout.root)?;
        Ok(Self { layout, settings })
    }

    /// Package list file for `kind`.
    #[must_use]
    pub fn package_list(&self, kind: PackageKind) -> PathBuf {
        self.layout.in_root(self.settings.list_file(kind))
    }

    /// Directory whose subdirectories are linked.
    #[must_use]
    pub fn config_source(&self) -> PathBuf {
        self.layout.in_root(&self.settings.config_dir)
    }
}
