//! Fork-join thread pool over independent tasks.
//!
//! Every task is queued on a crossbeam channel before any worker is
//! joined. Workers pull tasks until the queue is drained, render each
//! task's whole block into a private buffer, and append that buffer to
//! the shared sink under a mutex. Blocks therefore never interleave,
//! but their order across tasks is unspecified.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::thread;

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use super::{integrate_task, write_block_with, EnsembleStrategy, Task};
use crate::config::EnsembleConfig;
use crate::driver::DriverError;
use crate::integrator::{OrbitIntegrator, OrbitReport};
use crate::task::{RunStatus, TaskError, TaskFailure};

/// Runs tasks on `-threads=` scoped worker threads.
#[derive(Clone, Debug, Default)]
pub struct ThreadParallel {
    config: EnsembleConfig,
}

impl ThreadParallel {
    /// Create with the given driver settings.
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    /// Run every task through `body` on the worker pool.
    pub(crate) fn run_with<F>(
        &self,
        tasks: &[Task],
        out: &mut (dyn Write + Send),
        body: F,
    ) -> Result<RunStatus, DriverError>
    where
        F: Fn(&Task, &mut dyn Write) -> Result<OrbitReport, TaskError> + Sync,
    {
        let threads = self.config.resolved_thread_count().min(tasks.len().max(1));
        info!(tasks = tasks.len(), threads, "parallel ensemble started");

        let (task_tx, task_rx) = crossbeam_channel::unbounded::<&Task>();
        for task in tasks {
            // The receiver is alive in this scope, so sending cannot fail.
            let _ = task_tx.send(task);
        }
        drop(task_tx);

        let state = Shared {
            sink: Mutex::new(Sink { out, error: None }),
            failures: Mutex::new(Vec::new()),
        };
        thread::scope(|scope| {
            for worker in 0..threads {
                let rx = task_rx.clone();
                let state = &state;
                let body = &body;
                scope.spawn(move || worker_loop(worker, rx, body, state));
            }
        });

        let Shared { sink, failures } = state;
        let sink = sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(e) = sink.error {
            return Err(e.into());
        }
        sink.out.flush()?;
        let failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
        let status = RunStatus::new(tasks.len(), failures);
        info!(
            tasks = status.tasks,
            failed = status.failures.len(),
            "parallel ensemble finished"
        );
        Ok(status)
    }
}

/// State shared by all workers of one run.
struct Shared<'a> {
    sink: Mutex<Sink<'a>>,
    failures: Mutex<Vec<TaskFailure>>,
}

struct Sink<'a> {
    out: &'a mut (dyn Write + Send),
    /// First write error; later blocks are dropped once set.
    error: Option<std::io::Error>,
}

impl EnsembleStrategy for ThreadParallel {
    fn name(&self) -> &str {
        "parallel"
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

/// Runs until the task queue is drained.
fn worker_loop<F>(worker: usize, task_rx: Receiver<&Task>, body: &F, state: &Shared<'_>)
where
    F: Fn(&Task, &mut dyn Write) -> Result<OrbitReport, TaskError>,
{
    while let Ok(task) = task_rx.recv() {
        debug!(worker, task = task.id.0, "task picked up");
        let mut block = Vec::new();
        // Writes into a Vec cannot fail.
        let failure = write_block_with(task, &mut block, |out| body(task, out))
            .ok()
            .flatten();

        {
            let mut sink = state.sink.lock().unwrap_or_else(PoisonError::into_inner);
            if sink.error.is_none() {
                if let Err(e) = sink.out.write_all(&block) {
                    sink.error = Some(e);
                }
            }
        }
        if let Some(failure) = failure {
            state
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(failure);
        }
    }
}
