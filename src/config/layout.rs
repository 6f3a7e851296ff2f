use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;

/// Environment variable overriding the dotfiles root.
pub const ROOT_ENV: &str = "DOTFILES_ROOT";

/// Paths used by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// User home directory.
    pub home: PathBuf,
    /// Dotfiles checkout holding the package lists and the config tree.
    pub root: PathBuf,
    /// Directory that receives one symlink per config entry.
    pub config_dest: PathBuf,
}

impl Layout {
    /// Derive the layout from `home` and optional overrides.
    ///
    /// Defaults are `~/Workspace/dotfiles` and `~/.config`.
    #[must_use]
    pub fn resolve(home: PathBuf, root: Option<PathBuf>, target: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| home.join("Workspace").join("dotfiles"));
        let config_dest = target.unwrap_or_else(|| home.join(".config"));
        Self {
            home,
            root,
            config_dest,
        }
    }

    /// Resolve the layout from the process environment.
    ///
    /// An explicit `root` wins over `DOTFILES_ROOT`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::HomeDirUnavailable`] if no home directory is
    /// set, or [`BootstrapError::WorkingDirUnavailable`] if a relative path
    /// was given and the current directory cannot be read.
    pub fn from_env(root: Option<PathBuf>, target: Option<PathBuf>) -> Result<Self, BootstrapError> {
        Self::from_vars(root, target, |name| std::env::var_os(name), std::env::current_dir)
    }

    /// Resolve the layout from an environment lookup and a working directory.
    ///
    /// Relative roots are anchored at `cwd` so that link targets written
    /// under the destination never resolve against the destination itself.
    /// `cwd` is only called when a relative path is present.
    ///
    /// # Errors
    ///
    /// Same as [`Layout::from_env`].
    pub fn from_vars(
        root: Option<PathBuf>,
        target: Option<PathBuf>,
        var: impl Fn(&str) -> Option<OsString>,
        cwd: impl FnOnce() -> io::Result<PathBuf>,
    ) -> Result<Self, BootstrapError> {
        let home = home_dir_from(&var)?;
        let root = root.or_else(|| non_empty(var(ROOT_ENV)).map(PathBuf::from));

        let has_relative = root.iter().chain(target.iter()).any(|p| p.is_relative());
        let (root, target) = if has_relative {
            let cwd = cwd().map_err(|source| BootstrapError::WorkingDirUnavailable { source })?;
            (root.map(|p| cwd.join(p)), target.map(|p| cwd.join(p)))
        } else {
            (root, target)
        };
        Ok(Self::resolve(home, root, target))
    }

    /// Path of a file relative to the dotfiles root.
    #[must_use]
    pub fn in_root(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the user's home directory through `var`.
///
/// Reads `HOME`, preferring `USERPROFILE` on Windows. Empty values count as
/// unset.
///
/// # Errors
///
/// Returns [`BootstrapError::HomeDirUnavailable`] if neither is set.
pub fn home_dir_from(var: impl Fn(&str) -> Option<OsString>) -> Result<PathBuf, BootstrapError> {
    let lookup = |name: &str| non_empty(var(name));
    let home = if cfg!(target_os = "windows") {
        lookup("USERPROFILE").or_else(|| lookup("HOME"))
    } else {
        lookup("HOME")
    };
    home.map(PathBuf::from)
        .ok_or(BootstrapError::HomeDirUnavailable)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<OsString> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(*value))
        }
    }

    fn no_cwd() -> io::Result<PathBuf> {
        Err(io::Error::other("cwd must not be consulted"))
    }

    #[test]
    fn unset_home_is_fatal() {
        let err = home_dir_from(env(&[("DOTFILES_ROOT", "/src/dots")])).unwrap_err();
        assert!(matches!(err, BootstrapError::HomeDirUnavailable));
    }

    #[test]
    fn empty_home_is_fatal() {
        let err = home_dir_from(env(&[("HOME", ""), ("USERPROFILE", "")])).unwrap_err();
        assert!(matches!(err, BootstrapError::HomeDirUnavailable));
    }

    #[cfg(not(windows))]
    #[test]
    fn home_comes_from_home_var() {
        let home = home_dir_from(env(&[("HOME", "/home/me"), ("USERPROFILE", "/other")])).unwrap();
        assert_eq!(home, PathBuf::from("/home/me"));
    }

    #[test]
    fn missing_home_fails_layout_before_anything_else() {
        let err = Layout::from_vars(Some(PathBuf::from("dots")), None, env(&[]), no_cwd).unwrap_err();
        assert!(matches!(err, BootstrapError::HomeDirUnavailable));
    }

    #[test]
    fn relative_root_is_anchored_at_working_directory() {
        let layout = Layout::from_vars(
            Some(PathBuf::from("dots")),
            Some(PathBuf::from("xdg")),
            env(&[("HOME", "/home/me")]),
            || Ok(PathBuf::from("/work")),
        )
        .unwrap();
        assert_eq!(layout.root, PathBuf::from("/work/dots"));
        assert_eq!(layout.config_dest, PathBuf::from("/work/xdg"));
    }

    #[test]
    fn relative_root_env_var_is_anchored_too() {
        let layout = Layout::from_vars(
            None,
            None,
            env(&[("HOME", "/home/me"), ("DOTFILES_ROOT", "checkouts/dots")]),
            || Ok(PathBuf::from("/work")),
        )
        .unwrap();
        assert_eq!(layout.root, PathBuf::from("/work/checkouts/dots"));
    }

    #[cfg(unix)]
    #[test]
    fn flag_wins_over_root_env_var() {
        let layout = Layout::from_vars(
            Some(PathBuf::from("/flag")),
            None,
            env(&[("HOME", "/home/me"), ("DOTFILES_ROOT", "/env")]),
            no_cwd,
        )
        .unwrap();
        assert_eq!(layout.root, PathBuf::from("/flag"));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_paths_skip_working_directory() {
        let layout = Layout::from_vars(None, None, env(&[("HOME", "/home/me")]), no_cwd).unwrap();
        assert_eq!(layout.root, PathBuf::from("/home/me/Workspace/dotfiles"));
    }

    #[test]
    fn unreadable_working_directory_is_fatal_for_relative_root() {
        let err = Layout::from_vars(
            Some(PathBuf::from("dots")),
            None,
            env(&[("HOME", "/home/me")]),
            no_cwd,
        )
        .unwrap_err();
        assert!(matches!(err, BootstrapError::WorkingDirUnavailable { .. }));
    }

    #[test]
    fn defaults_hang_off_home() {
        let layout = Layout::resolve(PathBuf::from("/home/me"), None, None);
        assert_eq!(layout.root, PathBuf::from("/home/me/Workspace/dotfiles"));
        assert_eq!(layout.config_dest, PathBuf::from("/home/me/.config"));
    }

    #[test]
    fn overrides_replace_defaults() {
        let layout = Layout::resolve(
            PathBuf::from("/home/me"),
            Some(PathBuf::from("/src/dots")),
            Some(PathBuf::from("/tmp/xdg")),
        );
        assert_eq!(layout.root, PathBuf::from("/src/dots"));
        assert_eq!(layout.config_dest, PathBuf::from("/tmp/xdg"));
        assert_eq!(layout.home, PathBuf::from("/home/me"));
    }

    #[test]
    fn in_root_joins_relative_path() {
        let layout = Layout::resolve(PathBuf::from("/h"), Some(PathBuf::from("/d")), None);
        assert_eq!(
            layout.in_root("brew_casks.txt"),
            PathBuf::from("/d/brew_casks.txt")
        );
    }
}
