//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages become [`tracing`] events; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) routes them to the
/// console and to `$XDG_CACHE_HOME/bootstrap/<command>.log`.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// written by the subscriber's file layer.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed tasks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded tasks.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            self.info(&summary_line(task));
        }
        self.info(&totals_line(&tasks));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

/// Render one coloured summary row for `task`.
fn summary_line(task: &TaskEntry) -> String {
    let (icon, color) = match task.status {
        TaskStatus::Ok => ("✓", "\x1b[32m"),
        TaskStatus::NotApplicable => ("·", "\x1b[2m"),
        TaskStatus::Skipped => ("○", "\x1b[33m"),
        TaskStatus::DryRun => ("~", "\x1b[37m"),
        TaskStatus::Failed => ("✗", "\x1b[31m"),
    };
    let suffix = task
        .message
        .as_ref()
        .map_or_else(String::new, |msg| format!(" ({msg})"));
    format!("{color}{icon} {}{suffix}\x1b[0m", task.name)
}

/// Render the closing totals row.
fn totals_line(tasks: &[TaskEntry]) -> String {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
    format!(
        "{} tasks: \x1b[32m{} ok\x1b[0m, \x1b[2m{} n/a\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[37m{} dry-run\x1b[0m, \x1b[31m{} failed\x1b[0m",
        tasks.len(),
        count(TaskStatus::Ok),
        count(TaskStatus::NotApplicable),
        count(TaskStatus::Skipped),
        count(TaskStatus::DryRun),
        count(TaskStatus::Failed),
    )
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::utils::strip_ansi;

    fn entry(name: &str, status: TaskStatus, message: Option<&str>) -> TaskEntry {
        TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        }
    }

    #[test]
    fn logger_starts_empty() {
        let log = Logger::new("test");
        assert!(log.task_entries().is_empty(), "expected empty task list");
    }

    #[test]
    fn record_task_with_message() {
        let log = Logger::new("test");
        log.record_task("Install casks", TaskStatus::Skipped, Some("brew not found"));
        let tasks = log.task_entries();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Install casks");
        assert_eq!(tasks[0].message, Some("brew not found".to_string()));
    }

    #[test]
    fn failure_count_returns_correct_count() {
        let log = Logger::new("test");
        assert_eq!(log.failure_count(), 0);
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, Some("boom"));
        log.record_task("c", TaskStatus::Skipped, None);
        assert_eq!(log.failure_count(), 1);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let log = Logger::new("test");
        let log_ref: &dyn Log = &log;
        log_ref.record_task("via-trait", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
    }

    #[test]
    fn summary_line_renders_message() {
        let line = strip_ansi(&summary_line(&entry(
            "Install formulae",
            TaskStatus::Skipped,
            Some("brew not found"),
        )));
        insta::assert_snapshot!(line, @"○ Install formulae (brew not found)");
    }

    #[test]
    fn totals_line_counts_each_status() {
        let tasks = vec![
            entry("Install formulae", TaskStatus::Ok, None),
            entry("Install casks", TaskStatus::Skipped, Some("list missing")),
            entry("Link configs", TaskStatus::Failed, Some("unreadable")),
        ];
        let line = strip_ansi(&totals_line(&tasks));
        insta::assert_snapshot!(line, @"3 tasks: 1 ok, 0 n/a, 1 skipped, 0 dry-run, 1 failed");
    }
}
