//! Typed error variants for resource operations.
//!
//! Resource code returns these through [`anyhow::Error`]; tasks log them and
//! continue, so none of them ends the run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from resource apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command exited non-zero.
    #[error("command '{command}' failed (exit {})", exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    ExecutionFailed {
        /// Program and arguments as run.
        command: String,
        /// Exit code, `None` if the process was killed by a signal.
        exit_code: Option<i32>,
    },

    /// A filesystem call failed.
    #[error("could not {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `"link"`).
        action: &'static str,
        /// Path the call operated on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
