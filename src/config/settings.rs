use serde::Deserialize;
use std::path::Path;

use super::packages::PackageKind;
use super::toml_loader;
use crate::error::ConfigError;

/// Name of the optional settings file in the dotfiles root.
pub const SETTINGS_FILE: &str = "bootstrap.toml";

/// Tunable names; every key defaults to the fixed Homebrew conventions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Package manager executable.
    pub package_manager: String,
    /// Formula list file, relative to the dotfiles root.
    pub formulae: String,
    /// Cask list file, relative to the dotfiles root.
    pub casks: String,
    /// Directory under the dotfiles root whose subdirectories get linked.
    pub config_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_manager: "brew".to_string(),
            formulae: "brew_formulae.txt".to_string(),
            casks: "brew_casks.txt".to_string(),
            config_dir: "config".to_string(),
        }
    }
}

impl Settings {
    /// List file name for `kind`.
    #[must_use]
    pub fn list_file(&self, kind: PackageKind) -> &str {
        match kind {
            PackageKind::Formula => &self.formulae,
            PackageKind::Cask => &self.casks,
        }
    }
}

/// Load `bootstrap.toml` from `root`, or defaults if it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but is unreadable, malformed, or has
/// unknown keys.
pub fn load(root: &Path) -> Result<Settings, ConfigError> {
    toml_loader::load_config(&root.join(SETTINGS_FILE))
}
