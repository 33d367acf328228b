//! Reusable pusher and observer fixtures.
//!
//! - [`DriftPusher`]: `qu` moves linearly in time; exact and cheap.
//! - [`FailingPusher`]: fails deterministically after N pushes.
//! - [`RecordingObserver`]: records every observed time, stops on cue.

use gyre_core::{FieldNames, OutputRow, Pusher, StepError, Vec3};
use smallvec::smallvec;

/// Moves `qu` at constant speed; no field involved.
///
/// Time is `steps * dt`, so sample times are exact multiples of the step.
pub struct DriftPusher {
    pub dt: f64,
    pub speed: f64,
    pub start: Vec3,
    steps: u64,
    fields: FieldNames,
}

impl DriftPusher {
    pub fn new(dt: f64) -> Self {
        Self::with_motion(dt, [0.0; 3], 1.0)
    }

    pub fn with_motion(dt: f64, start: Vec3, speed: f64) -> Self {
        Self {
            dt,
            speed,
            start,
            steps: 0,
            fields: FieldNames::new(&["t", "qu", "qv", "qw"]),
        }
    }

    /// Number of successful pushes so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Pusher for DriftPusher {
    fn name(&self) -> &str {
        "drift"
    }

    fn time_step(&self) -> f64 {
        self.dt
    }

    fn push_state(&mut self, _time: f64) -> Result<f64, StepError> {
        self.steps += 1;
        Ok(self.steps as f64 * self.dt)
    }

    fn position(&self, _time: f64) -> Vec3 {
        let t = self.steps as f64 * self.dt;
        [self.start[0] + self.speed * t, self.start[1], self.start[2]]
    }

    fn velocity(&self, _time: f64) -> Vec3 {
        [self.speed, 0.0, 0.0]
    }

    fn output_fields(&self) -> &FieldNames {
        &self.fields
    }

    fn output_row(&self, time: f64) -> OutputRow {
        let q = self.position(time);
        smallvec![time, q[0], q[1], q[2]]
    }
}

/// Pushes like [`DriftPusher`] but returns an error on push `fail_at`
/// (1-based).
pub struct FailingPusher {
    inner: DriftPusher,
    fail_at: u64,
}

impl FailingPusher {
    pub fn new(dt: f64, fail_at: u64) -> Self {
        Self {
            inner: DriftPusher::new(dt),
            fail_at,
        }
    }
}

impl Pusher for FailingPusher {
    fn name(&self) -> &str {
        "failing"
    }

    fn time_step(&self) -> f64 {
        self.inner.dt
    }

    fn push_state(&mut self, time: f64) -> Result<f64, StepError> {
        if self.inner.steps() + 1 >= self.fail_at {
            return Err(StepError::NonFinite {
                quantity: "position",
                time,
            });
        }
        self.inner.push_state(time)
    }

    fn position(&self, time: f64) -> Vec3 {
        self.inner.position(time)
    }

    fn velocity(&self, time: f64) -> Vec3 {
        self.inner.velocity(time)
    }

    fn output_fields(&self) -> &FieldNames {
        self.inner.output_fields()
    }

    fn output_row(&self, time: f64) -> OutputRow {
        self.inner.output_row(time)
    }
}

/// Records every `(time, row)` it sees. Returns `false` once it has
/// seen `stop_after` observations, if set.
#[derive(Default)]
pub struct RecordingObserver {
    pub times: Vec<f64>,
    pub rows: Vec<OutputRow>,
    pub stop_after: Option<usize>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_after(n: usize) -> Self {
        Self {
            stop_after: Some(n),
            ..Self::default()
        }
    }
}

impl gyre_core::Observer for RecordingObserver {
    fn name(&self) -> &str {
        "recording"
    }

    fn observe(&mut self, pusher: &dyn Pusher, time: f64) -> Result<bool, StepError> {
        self.times.push(time);
        self.rows.push(pusher.output_row(time));
        Ok(self.stop_after.is_none_or(|n| self.times.len() < n))
    }
}
