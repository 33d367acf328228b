//! Explicit fixed-step ODE steppers.
//!
//! Each stepper is self-describing (name, aliases, order) so the
//! registry lookup and the help text are derived from the variants
//! themselves.

use gyre_core::ConfigError;

/// Closed set of steppers available to the guiding-centre pusher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepperKind {
    /// Forward Euler, first order.
    Euler,
    /// Heun's method (explicit trapezoid), second order.
    Heun,
    /// Classical fourth-order Runge-Kutta.
    RungeKutta,
}

impl StepperKind {
    /// All variants, in help order.
    pub const ALL: [StepperKind; 3] = [
        StepperKind::Euler,
        StepperKind::Heun,
        StepperKind::RungeKutta,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            StepperKind::Euler => "euler",
            StepperKind::Heun => "heun",
            StepperKind::RungeKutta => "rungekutta",
        }
    }

    /// Alternative names accepted by [`from_name`](Self::from_name).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StepperKind::Euler => &["explicit-euler"],
            StepperKind::Heun => &["rk2"],
            StepperKind::RungeKutta => &["rk4"],
        }
    }

    /// Convergence order.
    pub fn order(self) -> u32 {
        match self {
            StepperKind::Euler => 1,
            StepperKind::Heun => 2,
            StepperKind::RungeKutta => 4,
        }
    }

    /// Resolve a canonical name or alias.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name || k.aliases().contains(&name))
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "stepper",
                name: name.to_string(),
                available: Self::ALL.iter().map(|k| k.name()).collect(),
            })
    }

    /// Advance `y` from `t` by `dt` under `dy/dt = f(t, y)`.
    pub fn step<const N: usize, F>(self, f: F, t: f64, y: &[f64; N], dt: f64) -> [f64; N]
    where
        F: Fn(f64, &[f64; N]) -> [f64; N],
    {
        match self {
            StepperKind::Euler => axpy(y, dt, &f(t, y)),
            StepperKind::Heun => {
                let k1 = f(t, y);
                let k2 = f(t + dt, &axpy(y, dt, &k1));
                let mut out = *y;
                for i in 0..N {
                    out[i] += 0.5 * dt * (k1[i] + k2[i]);
                }
                out
            }
            StepperKind::RungeKutta => {
                let h = 0.5 * dt;
                let k1 = f(t, y);
                let k2 = f(t + h, &axpy(y, h, &k1));
                let k3 = f(t + h, &axpy(y, h, &k2));
                let k4 = f(t + dt, &axpy(y, dt, &k3));
                let mut out = *y;
                for i in 0..N {
                    out[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
                }
                out
            }
        }
    }
}

/// `y + a * x`.
fn axpy<const N: usize>(y: &[f64; N], a: f64, x: &[f64; N]) -> [f64; N] {
    let mut out = *y;
    for (o, xi) in out.iter_mut().zip(x) {
        *o += a * xi;
    }
    out
}
