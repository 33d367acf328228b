//! The [`Observer`] trait.

use crate::error::StepError;
use crate::pusher::Pusher;

/// Per-step predicate and recorder.
///
/// Invoked by the orbit integrator after every state advance (and once
/// at time 0). Returning `Ok(false)` stops the integration. Decisions
/// depend only on the pusher's accessors, the time, and state the
/// observer explicitly owns (e.g. skip counters).
pub trait Observer {
    /// Registry name of the observer.
    fn name(&self) -> &str;

    /// Observe the pusher at `time`; `Ok(true)` to keep integrating.
    fn observe(&mut self, pusher: &dyn Pusher, time: f64) -> Result<bool, StepError>;
}
