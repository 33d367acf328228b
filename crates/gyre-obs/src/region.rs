//! Bounded-region predicate on the first position coordinate.

use std::io::Write;

use gyre_core::vec3::U;
use gyre_core::{ConfigError, Observer, Options, Pusher, StepError};

use crate::step::StepRecorder;
use crate::writer::RowWriter;

enum Emission<'w> {
    /// Write at time 0 and once more at the final or boundary sample.
    Boundary {
        writer: RowWriter<'w>,
        final_written: bool,
    },
    /// Delegate every in-bounds step.
    Step(StepRecorder<'w>),
}

/// Continues while `qumin <= qu <= qumax`.
///
/// In boundary mode the final row is written at the first in-bounds
/// sample whose next step would pass `tfinal`, or at the first sample
/// outside the bounds. That row is latched: it is written at most once
/// per run, however many times the predicate is invoked afterwards.
pub struct RegionPredicate<'w> {
    qu_min: f64,
    qu_max: f64,
    time_final: f64,
    emission: Emission<'w>,
}

impl<'w> RegionPredicate<'w> {
    /// Boundary-mode predicate writing to `out`.
    pub fn boundary(out: &'w mut dyn Write, qu_min: f64, qu_max: f64, time_final: f64) -> Self {
        Self {
            qu_min,
            qu_max,
            time_final,
            emission: Emission::Boundary {
                writer: RowWriter::new(out),
                final_written: false,
            },
        }
    }

    /// Step-mode predicate delegating in-bounds steps to `recorder`.
    pub fn step_mode(recorder: StepRecorder<'w>, qu_min: f64, qu_max: f64) -> Self {
        Self {
            qu_min,
            qu_max,
            time_final: f64::INFINITY,
            emission: Emission::Step(recorder),
        }
    }

    /// Build from `-qumin= -qumax= -tfinal= -step-mode` (plus the step
    /// recorder options in step mode).
    pub fn from_options(options: &Options, out: &'w mut dyn Write) -> Result<Self, ConfigError> {
        let qu_min = options.get_or("qumin", f64::MIN)?;
        let qu_max = options.get_or("qumax", f64::MAX)?;
        if qu_min.is_nan() || qu_max.is_nan() || qu_min > qu_max {
            return Err(ConfigError::InvalidSetting {
                setting: "qumin/qumax",
                reason: format!("empty interval [{qu_min}, {qu_max}]"),
            });
        }
        if options.flag("step-mode") {
            let recorder = StepRecorder::from_options(options, out)?;
            Ok(Self::step_mode(recorder, qu_min, qu_max))
        } else {
            let time_final = options.get_or("tfinal", 1.0)?;
            Ok(Self::boundary(out, qu_min, qu_max, time_final))
        }
    }

    fn within_bounds(&self, qu: f64) -> bool {
        qu >= self.qu_min && qu <= self.qu_max
    }
}

impl Observer for RegionPredicate<'_> {
    fn name(&self) -> &str {
        "region"
    }

    fn observe(&mut self, pusher: &dyn Pusher, time: f64) -> Result<bool, StepError> {
        let inside = self.within_bounds(pusher.position(time)[U]);
        let time_final = self.time_final;
        match &mut self.emission {
            Emission::Step(recorder) => {
                if inside {
                    recorder.observe(pusher, time)?;
                }
                Ok(inside)
            }
            Emission::Boundary {
                writer,
                final_written,
            } => {
                // Sample times are `k * dt`. The last sample at or before
                // tfinal is final even when tfinal is not a multiple of dt.
                let is_final = if inside {
                    let dt = pusher.time_step();
                    let next = ((time / dt).round() + 1.0) * dt;
                    time >= time_final || next > time_final
                } else {
                    time > 0.0
                };
                let initial = inside && time == 0.0;
                if initial || (is_final && !*final_written) {
                    writer.write(pusher, time)?;
                }
                if is_final {
                    *final_written = true;
                }
                Ok(inside)
            }
        }
    }
}
