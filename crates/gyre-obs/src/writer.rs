//! Row sink shared by observer variants.

use std::io::Write;

use gyre_core::{Pusher, StepError};

/// Writes pusher rows to a borrowed sink in the pusher's number format.
pub struct RowWriter<'w> {
    out: &'w mut dyn Write,
    rows: u64,
}

impl<'w> RowWriter<'w> {
    /// Wrap `out`.
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out, rows: 0 }
    }

    /// Write the pusher's row for `time`.
    pub fn write(&mut self, pusher: &dyn Pusher, time: f64) -> Result<(), StepError> {
        let row = pusher.output_row(time);
        pusher.number_format().write_row(&mut *self.out, &row)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}
