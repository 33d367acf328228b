//! Ensemble strategies and the task-block runner they share.
//!
//! A task block is self-contained:
//!
//! ```text
//! # task <index>: <private options>
//! # fields: t qu qv qw ...
//! <rows>
//! [# elapsed time: <seconds>s]
//! [# task <index> failed: <reason>]
//! ```

pub mod parallel;
pub mod sequential;
pub mod worker;

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};

use gyre_core::Options;
use tracing::{debug, warn};

use crate::boxes::TaskBoxes;
use crate::config::EnsembleConfig;
use crate::driver::DriverError;
use crate::header::write_task_header;
use crate::integrator::{OrbitIntegrator, OrbitReport};
use crate::task::{RunStatus, TaskError, TaskFailure, TaskId};

/// One unit of ensemble work: a private option line and its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Position among the tasks of the input.
    pub id: TaskId,
    /// Private options, appended after the shared ones.
    pub private: String,
}

impl Task {
    /// Create a task.
    pub fn new(index: usize, private: impl Into<String>) -> Self {
        Self {
            id: TaskId(index),
            private: private.into(),
        }
    }
}

/// Read one task per line. Blank lines and `#` comments are skipped
/// and do not consume a task index.
pub fn read_ensemble(reader: impl BufRead) -> io::Result<Vec<Task>> {
    let mut tasks = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        tasks.push(Task::new(tasks.len(), trimmed));
    }
    Ok(tasks)
}

/// A way of running every task of an ensemble.
///
/// Implementations write task blocks only; the run header belongs to
/// the driver. The returned status lists every failed task. A
/// [`DriverError`] means the sink itself failed.
pub trait EnsembleStrategy {
    /// Strategy name, for logs.
    fn name(&self) -> &str;

    /// Run `tasks` against the `shared` option string.
    fn run(
        &self,
        shared: &str,
        tasks: &[Task],
        out: &mut (dyn Write + Send),
    ) -> Result<RunStatus, DriverError>;
}

/// Build and integrate one task, writing its block body to `out`.
fn integrate_task(
    shared: &str,
    task: &Task,
    integrator: &OrbitIntegrator,
    elapsed: bool,
    out: &mut dyn Write,
) -> Result<OrbitReport, TaskError> {
    let options = Options::compose(shared, &task.private);
    let report = {
        let mut boxes = TaskBoxes::build(&options, out)?;
        boxes.integrate(integrator)?
    };
    if elapsed {
        writeln!(out, "{}", report.diagnostic())?;
    }
    Ok(report)
}

/// Write a complete block for `task` to `out`, containing any panic.
///
/// Task failures are returned, not propagated; only a failure to
/// write the block framing itself is an `Err`.
pub(crate) fn write_task_block(
    shared: &str,
    task: &Task,
    config: &EnsembleConfig,
    out: &mut dyn Write,
) -> io::Result<Option<TaskFailure>> {
    let integrator = OrbitIntegrator::new(config.peek_beyond);
    write_block_with(task, out, |out| {
        integrate_task(shared, task, &integrator, config.elapsed, out)
    })
}

/// Frame the block that `body` writes for `task`: header first, then
/// the body's rows, then a failure marker if the body failed or panicked.
pub(crate) fn write_block_with<F>(
    task: &Task,
    out: &mut dyn Write,
    body: F,
) -> io::Result<Option<TaskFailure>>
where
    F: FnOnce(&mut dyn Write) -> Result<OrbitReport, TaskError>,
{
    write_task_header(out, task.id, &task.private)?;
    let result = catch_unwind(AssertUnwindSafe(|| body(&mut *out))).unwrap_or_else(|payload| {
        Err(TaskError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    });
    match result {
        Ok(report) => {
            debug!(task = task.id.0, steps = report.steps, stop = ?report.stop, "task finished");
            Ok(None)
        }
        Err(error) => {
            let failure = TaskFailure {
                task: task.id,
                error,
            };
            warn!(task = task.id.0, error = %failure.error, "task failed");
            writeln!(out, "# {failure}")?;
            Ok(Some(failure))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_ensemble_skips_blank_and_comment_lines() {
        let input = "-qu=0.1\n\n# comment\n  -qu=0.2  \n";
        let tasks = read_ensemble(input.as_bytes()).unwrap();
        assert_eq!(
            tasks,
            vec![Task::new(0, "-qu=0.1"), Task::new(1, "-qu=0.2")]
        );
    }

    #[test]
    fn failed_task_block_ends_with_marker() {
        let mut out = Vec::new();
        let failure = write_task_block(
            "-tfinal=1",
            &Task::new(3, "-pusher=leapfrog"),
            &EnsembleConfig::default(),
            &mut out,
        )
        .unwrap()
        .unwrap();
        assert_eq!(failure.task, TaskId(3));
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# task 3: -pusher=leapfrog\n\
             # task 3 failed: configuration error: unknown pusher 'leapfrog' \
             (available: boris, guiding-centre)\n"
        );
    }

    #[test]
    fn elapsed_line_follows_rows() {
        let mut out = Vec::new();
        let config = EnsembleConfig {
            elapsed: true,
            ..EnsembleConfig::default()
        };
        let failure =
            write_task_block("-tfinal=1 -samples=4", &Task::new(0, ""), &config, &mut out)
                .unwrap();
        assert!(failure.is_none());
        let text = String::from_utf8(out).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("# elapsed time: "));
    }

    #[test]
    fn panicking_body_still_gets_a_complete_block() {
        let mut out = Vec::new();
        let failure = write_block_with(&Task::new(5, "-qu=0.5"), &mut out, |out| {
            writeln!(out, "0 0.5 0 0")?;
            panic!("field evaluation blew up");
        })
        .unwrap()
        .unwrap();
        assert_eq!(failure.task, TaskId(5));
        assert!(matches!(failure.error, TaskError::Panicked { .. }));
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "# task 5: -qu=0.5\n0 0.5 0 0\n# task 5 failed: panicked: field evaluation blew up\n"
        );
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let payload = catch_unwind(|| panic!("gyron lost")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "gyron lost");
    }
}
