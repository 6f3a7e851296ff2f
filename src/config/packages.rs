use std::path::Path;

use crate::error::ConfigError;

/// Homebrew installable unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Command-line package.
    Formula,
    /// GUI application bundle, installed with `--cask`.
    Cask,
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Formula => write!(f, "formula"),
            Self::Cask => write!(f, "cask"),
        }
    }
}

/// Split a package list into trimmed, non-empty names, keeping file order.
#[must_use]
pub fn parse(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read the package list at `path`.
///
/// Unlike the TOML settings, a missing list is reported as an error so the
/// caller can warn about it.
///
/// Lines are decoded one at a time, so a line that is not valid UTF-8 only
/// affects its own entry.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file is missing or unreadable.
pub fn load(path: &Path) -> Result<Vec<String>, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes
        .split(|&b| b == b'\n')
        .flat_map(|line| parse(&String::from_utf8_lossy(line)))
        .collect())
}
