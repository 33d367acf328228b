//! The [`Pusher`] trait.

use crate::error::StepError;
use crate::output::{FieldNames, NumberFormat, OutputRow};
use crate::vec3::Vec3;

/// Owns one gyron's state and advances it in time.
///
/// # Contract
///
/// - The state is mutated only by [`push_state`](Pusher::push_state).
/// - `push_state` returns a time strictly greater than its argument.
///   Constructors reject settings that would give a non-positive step.
/// - [`output_fields`](Pusher::output_fields) is fixed at construction;
///   every [`output_row`](Pusher::output_row) has the same length.
/// - Construction validates the field provider (metric consistency,
///   requested projections) and fails before any step is taken.
pub trait Pusher: Send {
    /// Registry name of the pusher.
    fn name(&self) -> &str;

    /// Fixed time step, in pusher time units.
    fn time_step(&self) -> f64;

    /// Advance the state by one step starting at `time`.
    /// Returns the time of the new state.
    fn push_state(&mut self, time: f64) -> Result<f64, StepError>;

    /// Current position, in field-provider coordinates.
    fn position(&self, time: f64) -> Vec3;

    /// Current rate of change of the position.
    fn velocity(&self, time: f64) -> Vec3;

    /// Column names of [`output_row`](Pusher::output_row).
    fn output_fields(&self) -> &FieldNames;

    /// Values for the current state, time first.
    fn output_row(&self, time: f64) -> OutputRow;

    /// How rows from this pusher should be rendered.
    fn number_format(&self) -> NumberFormat {
        NumberFormat::Plain
    }
}
