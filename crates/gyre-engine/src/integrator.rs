//! The single-orbit driving loop.

use std::time::{Duration, Instant};

use gyre_core::{Observer, Pusher, StepError};
use tracing::trace;

/// Why an integration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The observer returned `false`.
    Observer,
    /// A push returned a time past the limit.
    TimeLimit,
}

/// Summary of one integration.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitReport {
    /// Observer invocations, including the time-0 call and any peek.
    pub observations: u64,
    /// Successful pushes.
    pub steps: u64,
    /// Time of the last state.
    pub final_time: f64,
    /// Why the loop ended.
    pub stop: StopReason,
    /// Wall-clock duration of the loop, excluding the peek.
    pub elapsed: Duration,
}

impl OrbitReport {
    /// The `# elapsed time: ...` diagnostic line.
    pub fn diagnostic(&self) -> String {
        format!("# elapsed time: {:.6}s", self.elapsed.as_secs_f64())
    }
}

/// Drives a pusher under an observer until one of them says stop.
///
/// The observer sees time 0 and then every pushed time up to and
/// including `time_final`. The first push past `time_final` ends the
/// loop; with `peek_beyond` the observer sees that one state too.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrbitIntegrator {
    /// Observe once more at the first time past the limit.
    pub peek_beyond: bool,
}

impl OrbitIntegrator {
    /// Create an integrator.
    pub fn new(peek_beyond: bool) -> Self {
        Self { peek_beyond }
    }

    /// Integrate from time 0 to `time_final`.
    ///
    /// # Errors
    ///
    /// Any [`StepError`] from the pusher or observer, or
    /// [`StepError::NonMonotonicTime`] if a push fails to advance time.
    pub fn integrate(
        &self,
        pusher: &mut dyn Pusher,
        observer: &mut dyn Observer,
        time_final: f64,
    ) -> Result<OrbitReport, StepError> {
        let start = Instant::now();
        let mut time = 0.0;
        let mut observations = 0;
        let mut steps = 0;

        let stop = loop {
            observations += 1;
            if !observer.observe(pusher, time)? {
                break StopReason::Observer;
            }
            let next = pusher.push_state(time)?;
            if !(next > time) {
                return Err(StepError::NonMonotonicTime {
                    previous: time,
                    next,
                });
            }
            time = next;
            steps += 1;
            if time > time_final {
                break StopReason::TimeLimit;
            }
        };
        let elapsed = start.elapsed();

        if self.peek_beyond && stop == StopReason::TimeLimit {
            observations += 1;
            observer.observe(pusher, time)?;
        }

        trace!(observations, steps, final_time = time, ?stop, "orbit integrated");
        Ok(OrbitReport {
            observations,
            steps,
            final_time: time,
            stop,
            elapsed,
        })
    }
}
