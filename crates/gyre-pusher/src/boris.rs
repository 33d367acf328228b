//! Full-orbit Boris pusher.
//!
//! Leapfrog scheme: positions live on integer steps, velocities on half
//! steps. The initial velocity is rotated back half a step so the first
//! push lands both on the right staggering.

use gyre_core::vec3::{add, cross, dot, is_finite, perpendicular_basis, scale, unit};
use gyre_core::{
    ConfigError, FieldNames, FieldProvider, NumberFormat, OutputRow, Pusher, StepError, Vec3,
};
use smallvec::smallvec;

use crate::settings::PusherSettings;

/// Columns every Boris row starts with.
pub const BASE_FIELDS: [&str; 7] = ["t", "qu", "qv", "qw", "vx", "vy", "vz"];

/// Full-orbit pusher.
///
/// The electric field is taken in units of `vref` tesla, so the
/// normalised equation of motion is `dv/dt = factor (E + v × B)`.
pub struct BorisPusher {
    field: Box<dyn FieldProvider>,
    settings: PusherSettings,
    fields: FieldNames,
    time_step: f64,
    factor: f64,
    steps: u64,
    position: Vec3,
    velocity: Vec3,
}

impl BorisPusher {
    /// Build from validated settings, taking ownership of `field`.
    pub fn new(settings: PusherSettings, field: Box<dyn FieldProvider>) -> Result<Self, ConfigError> {
        let b_unit = settings.validate_field(field.as_ref())?;
        let time_step = settings.time_step();
        let factor = settings.factor();
        let position = settings.position;

        let speed = settings.initial_speed();
        let vpar = settings.pitch * speed;
        let vperp = (1.0 - settings.pitch * settings.pitch).max(0.0).sqrt() * speed;
        let (e1, e2) = perpendicular_basis(b_unit);
        let (sin, cos) = settings.gyrophase.sin_cos();
        let v0 = add(
            scale(vpar, b_unit),
            add(scale(vperp * cos, e1), scale(vperp * sin, e2)),
        );

        let e = electric(field.as_ref(), position, 0.0);
        let b = field.magnetic_field().value(position, 0.0);
        let velocity = rotate(v0, e, b, -0.5 * time_step * factor);
        if !is_finite(velocity) {
            return Err(ConfigError::InvalidSetting {
                setting: "energy",
                reason: "initial half-step velocity is not finite".into(),
            });
        }

        Ok(Self {
            fields: settings.field_names(&BASE_FIELDS),
            field,
            settings,
            time_step,
            factor,
            steps: 0,
            position,
            velocity,
        })
    }
}

impl Pusher for BorisPusher {
    fn name(&self) -> &str {
        "boris"
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn push_state(&mut self, time: f64) -> Result<f64, StepError> {
        let e = electric(self.field.as_ref(), self.position, time);
        let b = self.field.magnetic_field().value(self.position, time);
        let velocity = rotate(self.velocity, e, b, self.time_step * self.factor);
        let position = add(self.position, scale(self.time_step, velocity));
        let next = (self.steps + 1) as f64 * self.time_step;
        if !is_finite(velocity) {
            return Err(StepError::NonFinite {
                quantity: "velocity",
                time: next,
            });
        }
        if !is_finite(position) {
            return Err(StepError::NonFinite {
                quantity: "position",
                time: next,
            });
        }
        self.velocity = velocity;
        self.position = position;
        self.steps += 1;
        Ok(next)
    }

    fn position(&self, _time: f64) -> Vec3 {
        self.position
    }

    fn velocity(&self, _time: f64) -> Vec3 {
        self.velocity
    }

    fn output_fields(&self) -> &FieldNames {
        &self.fields
    }

    fn output_row(&self, time: f64) -> OutputRow {
        let q = self.position;
        let v = self.velocity;
        let mut row: OutputRow = smallvec![time, q[0], q[1], q[2], v[0], v[1], v[2]];
        let b = self.field.magnetic_field().value(q, time);
        let vpar = unit(b).map_or(0.0, |b| dot(v, b));
        let vperp = (dot(v, v) - vpar * vpar).max(0.0).sqrt();
        self.settings
            .append_optional(&mut row, self.field.as_ref(), q, time, vpar, vperp);
        row
    }

    fn number_format(&self) -> NumberFormat {
        self.settings.number_format()
    }
}

fn electric(field: &dyn FieldProvider, q: Vec3, time: f64) -> Vec3 {
    field
        .electric_field()
        .map_or([0.0; 3], |e| e.value(q, time))
}

/// One Boris velocity update over `qdt = factor * dt`: half electric
/// kick, magnetic rotation, half electric kick.
fn rotate(v: Vec3, e: Vec3, b: Vec3, qdt: f64) -> Vec3 {
    let half = 0.5 * qdt;
    let v_minus = add(v, scale(half, e));
    let t = scale(half, b);
    let s = scale(2.0 / (1.0 + dot(t, t)), t);
    let v_prime = add(v_minus, cross(v_minus, t));
    let v_plus = add(v_minus, cross(v_prime, s));
    add(v_plus, scale(half, e))
}
