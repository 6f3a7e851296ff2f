//! Domain-specific error types for the bootstrap engine.
//!
//! Errors fall into two tiers:
//!
//! ```text
//! BootstrapError            fatal, aborts the run with a non-zero exit
//! ├── HomeDirUnavailable
//! ├── WorkingDirUnavailable
//! ├── ConfigSourceUnreadable
//! ├── DestinationRoot
//! └── Settings(ConfigError)
//!
//! ConfigError               recoverable when reading package lists
//! ```
//!
//! Recoverable failures (one package, one link) never become a
//! [`BootstrapError`]; tasks log them and move on. Command handlers convert
//! fatal errors to [`anyhow::Error`] via `?` at the CLI boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that terminate the run.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Neither `HOME` nor (on Windows) `USERPROFILE` is set.
    #[error("could not determine the user home directory")]
    HomeDirUnavailable,

    /// A relative `--root` or `--target` was given but the current
    /// directory is unknown.
    #[error("could not determine the current directory: {source}")]
    WorkingDirUnavailable {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config source tree could not be listed.
    #[error("could not read config source directory {}: {source}", path.display())]
    ConfigSourceUnreadable {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The destination root could not be created.
    #[error("could not create destination directory {}: {source}", path.display())]
    DestinationRoot {
        /// Destination root that failed to be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `bootstrap.toml` exists but is not valid.
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),
}

/// Errors raised while reading configuration inputs.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A TOML file failed to parse.
    #[error("invalid TOML in {}: {message}", path.display())]
    InvalidSyntax {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

impl ConfigError {
    /// Return `true` when the error means the file simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
