//! Guiding-centre pusher.
//!
//! State is `(qu, qv, qw, v∥)`. The magnetic moment is fixed at
//! construction from the initial perpendicular speed. Equations, in
//! normalised units with `b = B / |B|`:
//!
//! ```text
//! dq/dt  = v∥ b + (E × B) / B² + (μ / factor) (b × ∇|B|) / |B|
//! dv∥/dt = −μ b·∇|B| + factor E·b
//! ```

use gyre_core::vec3::{add, cross, dot, is_finite, scale};
use gyre_core::{
    ConfigError, FieldNames, FieldProvider, NumberFormat, OutputRow, Pusher, StepError, Vec3,
};
use smallvec::smallvec;

use crate::settings::PusherSettings;
use crate::stepper::StepperKind;

/// Columns every guiding-centre row starts with.
pub const BASE_FIELDS: [&str; 5] = ["t", "qu", "qv", "qw", "vpar"];

type GcState = [f64; 4];

/// Guiding-centre pusher.
pub struct GuidingCentrePusher {
    field: Box<dyn FieldProvider>,
    settings: PusherSettings,
    fields: FieldNames,
    stepper: StepperKind,
    time_step: f64,
    factor: f64,
    /// Magnetic moment per unit mass, `v⊥² / (2 |B|)`.
    mu: f64,
    steps: u64,
    state: GcState,
}

impl GuidingCentrePusher {
    /// Build from validated settings, taking ownership of `field`.
    pub fn new(settings: PusherSettings, field: Box<dyn FieldProvider>) -> Result<Self, ConfigError> {
        settings.validate_field(field.as_ref())?;
        let q = settings.position;
        let speed = settings.initial_speed();
        let vpar = settings.pitch * speed;
        let vperp2 = (1.0 - settings.pitch * settings.pitch).max(0.0) * speed * speed;
        let b0 = field.magnetic_field().magnitude(q, 0.0);
        let mu = vperp2 / (2.0 * b0);
        if !(mu.is_finite() && vpar.is_finite()) {
            return Err(ConfigError::InvalidSetting {
                setting: "energy",
                reason: "initial magnetic moment or parallel speed is not finite".into(),
            });
        }
        Ok(Self {
            fields: settings.field_names(&BASE_FIELDS),
            stepper: settings.stepper,
            time_step: settings.time_step(),
            factor: settings.factor(),
            mu,
            steps: 0,
            state: [q[0], q[1], q[2], vpar],
            field,
            settings,
        })
    }

    /// Magnetic moment per unit mass.
    pub fn magnetic_moment(&self) -> f64 {
        self.mu
    }

    fn rhs(&self, time: f64, y: &GcState) -> GcState {
        let q = [y[0], y[1], y[2]];
        let vpar = y[3];
        let magnetic = self.field.magnetic_field();
        let b_vec = magnetic.value(q, time);
        let b_mag = magnetic.magnitude(q, time);
        let b = scale(1.0 / b_mag, b_vec);
        let grad_b = magnetic.magnitude_gradient(q, time);

        let mut drift = add(
            scale(vpar, b),
            scale(self.mu / (self.factor * b_mag), cross(b, grad_b)),
        );
        let mut accel = -self.mu * dot(b, grad_b);
        if let Some(e_field) = self.field.electric_field() {
            let e = e_field.value(q, time);
            drift = add(drift, scale(1.0 / (b_mag * b_mag), cross(e, b_vec)));
            accel += self.factor * dot(e, b);
        }
        [drift[0], drift[1], drift[2], accel]
    }
}

impl Pusher for GuidingCentrePusher {
    fn name(&self) -> &str {
        "guiding-centre"
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn push_state(&mut self, time: f64) -> Result<f64, StepError> {
        let next_state = self
            .stepper
            .step(|t, y| self.rhs(t, y), time, &self.state, self.time_step);
        let next = (self.steps + 1) as f64 * self.time_step;
        if !is_finite([next_state[0], next_state[1], next_state[2]]) {
            return Err(StepError::NonFinite {
                quantity: "position",
                time: next,
            });
        }
        if !next_state[3].is_finite() {
            return Err(StepError::NonFinite {
                quantity: "vpar",
                time: next,
            });
        }
        self.state = next_state;
        self.steps += 1;
        Ok(next)
    }

    fn position(&self, _time: f64) -> Vec3 {
        [self.state[0], self.state[1], self.state[2]]
    }

    fn velocity(&self, time: f64) -> Vec3 {
        let d = self.rhs(time, &self.state);
        [d[0], d[1], d[2]]
    }

    fn output_fields(&self) -> &FieldNames {
        &self.fields
    }

    fn output_row(&self, time: f64) -> OutputRow {
        let q = self.position(time);
        let vpar = self.state[3];
        let mut row: OutputRow = smallvec![time, q[0], q[1], q[2], vpar];
        let b_mag = self.field.magnetic_field().magnitude(q, time);
        let vperp = (2.0 * self.mu * b_mag).max(0.0).sqrt();
        self.settings
            .append_optional(&mut row, self.field.as_ref(), q, time, vpar, vperp);
        row
    }

    fn number_format(&self) -> NumberFormat {
        self.settings.number_format()
    }
}
