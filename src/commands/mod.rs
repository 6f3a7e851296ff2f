pub mod restore;

use anyhow::Result;

use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Execute tasks in order, stopping at the first fatal error, then print the
/// summary.
///
/// `on_success` is logged as a stage header when every task ran.
///
/// # Errors
///
/// Returns the first error raised by a task.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
    on_success: &str,
) -> Result<()> {
    let outcome = tasks
        .into_iter()
        .try_for_each(|task| tasks::execute(task, ctx));

    if outcome.is_ok() {
        log.stage(on_success);
    }
    log.print_summary();
    outcome
}
