//! Per-task box construction.

use std::io::Write;

use gyre_core::{Observer, Options, Pusher};
use gyre_field::build_field;
use gyre_obs::build_observer;
use gyre_pusher::build_pusher;
use tracing::debug;

use crate::integrator::{OrbitIntegrator, OrbitReport};
use crate::task::TaskError;

/// The boxes of one task, built from its composed options.
pub struct TaskBoxes<'w> {
    /// Owns the gyron state and, through it, the field provider.
    pub pusher: Box<dyn Pusher>,
    /// Borrows the task's output sink.
    pub observer: Box<dyn Observer + 'w>,
    /// Integration limit (`-tfinal=`, default 1).
    pub time_final: f64,
}

impl<'w> TaskBoxes<'w> {
    /// Build field, pusher and observer from `options`, in that order.
    ///
    /// The pusher's `# fields:` header is written to `out` once the
    /// pusher exists and before the observer takes the sink, so every
    /// configuration error of the field or pusher leaves `out` untouched.
    pub fn build(options: &Options, out: &'w mut dyn Write) -> Result<Self, TaskError> {
        let field = build_field(options)?;
        let pusher = build_pusher(options, field)?;
        let time_final = options.get_or("tfinal", 1.0)?;
        writeln!(out, "{}", pusher.output_fields().header_line())?;
        let observer = build_observer(options, out)?;
        debug!(
            pusher = pusher.name(),
            observer = observer.name(),
            time_final,
            "task boxes built"
        );
        Ok(Self {
            pusher,
            observer,
            time_final,
        })
    }

    /// Run the orbit to completion.
    pub fn integrate(&mut self, integrator: &OrbitIntegrator) -> Result<OrbitReport, TaskError> {
        Ok(integrator.integrate(
            self.pusher.as_mut(),
            self.observer.as_mut(),
            self.time_final,
        )?)
    }
}
