//! Task identity, per-task errors and the aggregate run status.

use std::error::Error;
use std::fmt;

use gyre_core::{ConfigError, StepError};

/// Zero-based position of a task in its ensemble input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {}", self.0)
    }
}

// ── TaskError ──────────────────────────────────────────────────────

/// Why one task failed. Never affects sibling tasks.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskError {
    /// Box construction failed; no step was taken.
    Config(ConfigError),
    /// Integration failed part-way.
    Step(StepError),
    /// The task panicked; the panic was contained.
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Step(e) => write!(f, "stepping error: {e}"),
            Self::Panicked { message } => write!(f, "panicked: {message}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Step(e) => Some(e),
            Self::Panicked { .. } => None,
        }
    }
}

impl From<ConfigError> for TaskError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for TaskError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

impl From<std::io::Error> for TaskError {
    fn from(e: std::io::Error) -> Self {
        Self::Step(e.into())
    }
}

/// A failed task and its error.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskFailure {
    /// Which task.
    pub task: TaskId,
    /// What went wrong.
    pub error: TaskError,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.task, self.error)
    }
}

// ── RunStatus ──────────────────────────────────────────────────────

/// Outcome of a whole run: how many tasks ran and which failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStatus {
    /// Tasks attempted.
    pub tasks: usize,
    /// Failed tasks, ordered by [`TaskId`].
    pub failures: Vec<TaskFailure>,
}

impl RunStatus {
    /// Build from per-task failures in any order.
    pub fn new(tasks: usize, mut failures: Vec<TaskFailure>) -> Self {
        failures.sort_by_key(|f| f.task);
        Self { tasks, failures }
    }

    /// Whether every task succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit code: 0 on full success, 1 if any task failed.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_ordered_and_set_exit_code() {
        let failure = |i| TaskFailure {
            task: TaskId(i),
            error: TaskError::Panicked {
                message: "boom".into(),
            },
        };
        let status = RunStatus::new(5, vec![failure(3), failure(1)]);
        assert_eq!(status.failures[0].task, TaskId(1));
        assert_eq!(status.exit_code(), 1);
        assert_eq!(RunStatus::new(5, Vec::new()).exit_code(), 0);
    }

    #[test]
    fn config_error_is_the_source() {
        let e = TaskError::from(ConfigError::InconsistentMetric);
        assert!(e.source().is_some());
        assert_eq!(
            TaskFailure {
                task: TaskId(2),
                error: e
            }
            .to_string(),
            "task 2 failed: configuration error: electric and magnetic fields do not share one metric"
        );
    }
}
