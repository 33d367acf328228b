//! Tasks one after another, in input order.

use std::io::Write;

use tracing::info;

use super::{integrate_task, write_block_with, EnsembleStrategy, Task};
use crate::config::EnsembleConfig;
use crate::driver::DriverError;
use crate::integrator::{OrbitIntegrator, OrbitReport};
use crate::task::{RunStatus, TaskError};

/// The reference strategy: deterministic, single-threaded.
#[derive(Clone, Debug, Default)]
pub struct Sequential {
    config: EnsembleConfig,
}

impl Sequential {
    /// Create with the given driver settings.
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    /// Run every task through `body`, one after another.
    pub(crate) fn run_with<F>(
        &self,
        tasks: &[Task],
        out: &mut (dyn Write + Send),
        body: F,
    ) -> Result<RunStatus, DriverError>
    where
        F: Fn(&Task, &mut dyn Write) -> Result<OrbitReport, TaskError>,
    {
        info!(tasks = tasks.len(), "sequential ensemble started");
        let mut failures = Vec::new();
        for task in tasks {
            if let Some(failure) = write_block_with(task, out, |out| body(task, out))? {
                failures.push(failure);
            }
        }
        out.flush()?;
        let status = RunStatus::new(tasks.len(), failures);
        info!(
            tasks = status.tasks,
            failed = status.failures.len(),
            "sequential ensemble finished"
        );
        Ok(status)
    }
}

impl EnsembleStrategy for Sequential {
    fn name(&self) -> &str {
        "sequential"
    }

    fn run(
        &self,
        shared: &str,
        tasks: &[Task],
        out: &mut (dyn Write + Send),
    ) -> Result<RunStatus, DriverError> {
        let integrator = OrbitIntegrator::new(self.config.peek_beyond);
        self.run_with(tasks, out, |task, out| {
            integrate_task(shared, task, &integrator, self.config.elapsed, out)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyre_obs::StepRecorder;
    use gyre_test_utils::{DriftPusher, FailingPusher};

    use crate::task::TaskId;

    fn drift(out: &mut dyn Write) -> Result<OrbitReport, TaskError> {
        let mut pusher = DriftPusher::new(0.25);
        let mut recorder = StepRecorder::new(out, 0, false);
        Ok(OrbitIntegrator::default().integrate(&mut pusher, &mut recorder, 1.0)?)
    }

    #[test]
    fn failures_are_contained_to_their_own_task() {
        let tasks: Vec<Task> = (0..4).map(|i| Task::new(i, format!("-qu={i}"))).collect();
        let mut out = Vec::new();
        let status = Sequential::default()
            .run_with(&tasks, &mut out, |task, out| match task.id.0 {
                1 => panic!("boom in task 1"),
                2 => {
                    let mut pusher = FailingPusher::new(0.25, 3);
                    let mut recorder = StepRecorder::new(out, 0, false);
                    Ok(OrbitIntegrator::default().integrate(&mut pusher, &mut recorder, 1.0)?)
                }
                _ => drift(out),
            })
            .unwrap();

        assert_eq!(status.tasks, 4);
        assert_eq!(status.failures.len(), 2);
        assert_eq!(status.failures[0].task, TaskId(1));
        assert!(matches!(status.failures[0].error, TaskError::Panicked { .. }));
        assert_eq!(status.failures[1].task, TaskId(2));
        assert!(matches!(status.failures[1].error, TaskError::Step(_)));

        let text = String::from_utf8(out).unwrap();
        let headers: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("# task ") && !l.contains(" failed: "))
            .collect();
        assert_eq!(
            headers,
            ["# task 0: -qu=0", "# task 1: -qu=1", "# task 2: -qu=2", "# task 3: -qu=3"]
        );
        assert!(text.contains("# task 1: -qu=1\n# task 1 failed: panicked: boom in task 1\n"));
        assert!(text.contains("# task 2 failed: stepping error: "));
        // Task 3 runs in full after both failures.
        let last_block = text.lines().skip_while(|l| !l.starts_with("# task 3:")).skip(1);
        assert_eq!(last_block.count(), 5);
    }
}
