//! Log file location, colour stripping, and timestamps.
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::layout::home_dir_from;

/// Remove SGR colour codes (`ESC [ <params> m`) from `s`.
///
/// Only digit and `;` parameters are recognised; any other escape sequence
/// is kept as is.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((before, after)) = rest.split_once("\x1b[") {
        out.push_str(before);
        match after.split_once('m') {
            Some((params, tail)) if params.chars().all(|c| c.is_ascii_digit() || c == ';') => {
                rest = tail;
            }
            _ => {
                out.push_str("\x1b[");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Directory holding persistent logs: `$XDG_CACHE_HOME/bootstrap`, falling
/// back to `<home>/.cache/bootstrap`.
///
/// Empty variables count as unset. `None` when no home can be found either.
pub(super) fn log_dir(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let cache = match var("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home_dir_from(&var).ok()?.join(".cache"),
    };
    Some(cache.join("bootstrap"))
}

/// Log file for `command` inside [`log_dir`], read from the process env.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_dir(|name| std::env::var_os(name))?.join(format!("{command}.log")))
}

/// Format the current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn format_utc_datetime() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the current UTC time as `HH:MM:SS`.
pub(super) fn format_utc_time() -> String {
    chrono::Utc::now().format("%H:%M:%S").to_string()
}
