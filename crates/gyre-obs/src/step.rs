//! Unconditional step recorder.

use std::io::Write;

use gyre_core::{ConfigError, Observer, Options, Pusher, StepError};

use crate::writer::RowWriter;

/// Always continues; writes one row every `skip + 1` invocations.
///
/// The skip counter starts full, so the first invocation (time 0) is
/// written. With `-skip-initial` it starts empty and the first row is
/// written after `skip` invocations have been skipped.
pub struct StepRecorder<'w> {
    writer: RowWriter<'w>,
    skip: u64,
    skipped: u64,
}

impl<'w> StepRecorder<'w> {
    /// Recorder writing to `out`.
    pub fn new(out: &'w mut dyn Write, skip: u64, skip_initial: bool) -> Self {
        Self {
            writer: RowWriter::new(out),
            skip,
            skipped: if skip_initial { 0 } else { skip },
        }
    }

    /// Build from `-skip=` and `-skip-initial`.
    pub fn from_options(options: &Options, out: &'w mut dyn Write) -> Result<Self, ConfigError> {
        Ok(Self::new(
            out,
            options.get_or("skip", 0)?,
            options.flag("skip-initial"),
        ))
    }

    /// Rows written so far.
    pub fn rows(&self) -> u64 {
        self.writer.rows()
    }
}

impl Observer for StepRecorder<'_> {
    fn name(&self) -> &str {
        "step"
    }

    fn observe(&mut self, pusher: &dyn Pusher, time: f64) -> Result<bool, StepError> {
        if self.skipped < self.skip {
            self.skipped += 1;
        } else {
            self.writer.write(pusher, time)?;
            self.skipped = 0;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gyre_test_utils::DriftPusher;

    fn written_steps(skip: u64, skip_initial: bool, calls: usize) -> Vec<usize> {
        let pusher = DriftPusher::new(1.0);
        let mut out = Vec::new();
        let mut written = Vec::new();
        {
            let mut rec = StepRecorder::new(&mut out, skip, skip_initial);
            for step in 0..calls {
                let before = rec.rows();
                assert!(rec.observe(&pusher, step as f64).unwrap());
                if rec.rows() > before {
                    written.push(step);
                }
            }
        }
        assert_eq!(
            String::from_utf8(out).unwrap().lines().count(),
            written.len()
        );
        written
    }

    #[test]
    fn skip_two_writes_every_third_step() {
        assert_eq!(written_steps(2, false, 9), vec![0, 3, 6]);
    }

    #[test]
    fn skip_initial_shifts_the_phase() {
        assert_eq!(written_steps(2, true, 9), vec![2, 5, 8]);
    }

    #[test]
    fn skip_zero_writes_every_step() {
        assert_eq!(written_steps(0, false, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn rows_use_pusher_columns() {
        let pusher = DriftPusher::with_motion(0.5, [0.25, 0.0, 0.0], 1.0);
        let mut out = Vec::new();
        StepRecorder::new(&mut out, 0, false)
            .observe(&pusher, 0.0)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 0.25 0 0\n");
    }
}
