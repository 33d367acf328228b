//! Settings shared by every pusher variant.

use gyre_core::vec3::{is_finite, unit};
use gyre_core::{
    ConfigError, FieldNames, FieldProvider, NumberFormat, Options, OutputRow, Vec3,
};
use tracing::debug;

use crate::stepper::StepperKind;
use crate::units::{ELEMENTARY_CHARGE, PROTON_MASS};

/// Parsed and validated pusher options.
///
/// | Option | Default | Meaning |
/// |--------|---------|---------|
/// | `-samples=` | 512 | steps per `tfinal` |
/// | `-tfinal=` | 1 | integration limit, normalised time |
/// | `-lref=` / `-vref=` | 1 | reference length (m) / speed (m/s) |
/// | `-mass=` / `-charge=` | 1 | proton masses / proton charges |
/// | `-qu= -qv= -qw=` | 0.1, 0, 0 | initial position |
/// | `-energy=` | 1 | kinetic energy, eV |
/// | `-pitch=` | 0.5 | `v∥ / v` |
/// | `-gyrophase=` | 0 | initial gyrophase, rad |
/// | `-stepper=` | `rungekutta` | ODE stepper (guiding centre) |
///
/// Flags `-pxyz -pkin -pb -pjac` add output columns; `-phires` switches
/// rows to 16-digit scientific notation.
#[derive(Clone, Debug, PartialEq)]
pub struct PusherSettings {
    /// Steps per `time_final`.
    pub samples: usize,
    /// Integration limit, normalised time.
    pub time_final: f64,
    /// Reference length, metres.
    pub lref: f64,
    /// Reference speed, m/s.
    pub vref: f64,
    /// Mass, proton masses.
    pub mass: f64,
    /// Charge, proton charges.
    pub charge: f64,
    /// Initial position `(qu, qv, qw)`.
    pub position: Vec3,
    /// Kinetic energy, eV.
    pub energy: f64,
    /// Pitch `v∥ / v`.
    pub pitch: f64,
    /// Initial gyrophase, radians.
    pub gyrophase: f64,
    /// ODE stepper for pushers that need one.
    pub stepper: StepperKind,
    /// `-pxyz`: append Cartesian position.
    pub print_cartesian: bool,
    /// `-pkin`: append parallel and perpendicular energies (eV).
    pub print_kinetic: bool,
    /// `-pb`: append |B|.
    pub print_field: bool,
    /// `-pjac`: append the metric jacobian.
    pub print_jacobian: bool,
    /// `-phires`: high-resolution number format.
    pub high_resolution: bool,
}

impl PusherSettings {
    /// Parse from `options` and check every bound.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let stepper = match options.get_str("stepper") {
            Some(name) => StepperKind::from_name(name)?,
            None => StepperKind::RungeKutta,
        };
        let settings = Self {
            samples: options.get_or("samples", 512)?,
            time_final: options.get_or("tfinal", 1.0)?,
            lref: options.get_or("lref", 1.0)?,
            vref: options.get_or("vref", 1.0)?,
            mass: options.get_or("mass", 1.0)?,
            charge: options.get_or("charge", 1.0)?,
            position: [
                options.get_or("qu", 0.1)?,
                options.get_or("qv", 0.0)?,
                options.get_or("qw", 0.0)?,
            ],
            energy: options.get_or("energy", 1.0)?,
            pitch: options.get_or("pitch", 0.5)?,
            gyrophase: options.get_or("gyrophase", 0.0)?,
            stepper,
            print_cartesian: options.flag("pxyz"),
            print_kinetic: options.flag("pkin"),
            print_field: options.flag("pb"),
            print_jacobian: options.flag("pjac"),
            high_resolution: options.flag("phires"),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let dt = self.time_final / self.samples as f64;
        if self.samples == 0 || !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep {
                time_final: self.time_final,
                samples: self.samples,
            });
        }
        positive("lref", self.lref)?;
        positive("vref", self.vref)?;
        positive("mass", self.mass)?;
        if !self.charge.is_finite() || self.charge == 0.0 {
            return Err(invalid("charge", format!("must be finite and non-zero, got {}", self.charge)));
        }
        if !self.energy.is_finite() || self.energy < 0.0 {
            return Err(invalid("energy", format!("must be finite and >= 0, got {}", self.energy)));
        }
        if !(self.pitch.is_finite() && self.pitch.abs() <= 1.0) {
            return Err(invalid("pitch", format!("must lie in [-1, 1], got {}", self.pitch)));
        }
        if !self.gyrophase.is_finite() {
            return Err(invalid("gyrophase", "must be finite".into()));
        }
        if !is_finite(self.position) {
            return Err(invalid("qu/qv/qw", "initial position must be finite".into()));
        }
        if !self.factor().is_finite() {
            return Err(invalid(
                "charge",
                "charge-to-mass factor overflows for these lref/vref/mass".into(),
            ));
        }
        if !self.initial_speed().is_finite() {
            return Err(invalid(
                "energy",
                format!("initial speed overflows for energy {} eV at vref {}", self.energy, self.vref),
            ));
        }
        Ok(())
    }

    /// `tfinal / samples`, positive by construction.
    pub fn time_step(&self) -> f64 {
        self.time_final / self.samples as f64
    }

    /// Normalised charge-to-mass factor `q lref / (m vref)` (1/T).
    pub fn factor(&self) -> f64 {
        self.charge * ELEMENTARY_CHARGE * self.lref / (self.mass * PROTON_MASS * self.vref)
    }

    /// Energy of a particle moving at `vref`, in eV.
    pub fn reference_energy_ev(&self) -> f64 {
        0.5 * self.mass * PROTON_MASS * self.vref * self.vref / ELEMENTARY_CHARGE
    }

    /// Initial speed in units of `vref`.
    pub fn initial_speed(&self) -> f64 {
        (self.energy / self.reference_energy_ev()).sqrt()
    }

    /// Check the field provider before any state is built.
    ///
    /// Returns the unit field direction at the initial position.
    pub fn validate_field(&self, field: &dyn FieldProvider) -> Result<Vec3, ConfigError> {
        if !field.is_metric_consistent() {
            return Err(ConfigError::InconsistentMetric);
        }
        if self.print_cartesian && !field.supports_cartesian_projection() {
            return Err(ConfigError::CartesianProjectionUnavailable {
                metric: field.metric().name().to_string(),
            });
        }
        let b = field.magnetic_field().value(self.position, 0.0);
        let direction = unit(b).ok_or_else(|| {
            invalid("qu/qv/qw", "magnetic field vanishes at the initial position".into())
        })?;
        debug!(field = field.name(), metric = field.metric().name(), "field provider accepted");
        Ok(direction)
    }

    /// Column names for a pusher whose own columns are `base`.
    pub fn field_names(&self, base: &[&'static str]) -> FieldNames {
        let mut names = FieldNames::new(base);
        names.extend_if(self.print_cartesian, &["x", "y", "z"]);
        names.extend_if(self.print_kinetic, &["Epar", "Eperp"]);
        names.extend_if(self.print_field, &["B"]);
        names.extend_if(self.print_jacobian, &["jac"]);
        names
    }

    /// Row format selected by `-phires`.
    pub fn number_format(&self) -> NumberFormat {
        if self.high_resolution {
            NumberFormat::Scientific16
        } else {
            NumberFormat::Plain
        }
    }

    /// Append the optional columns, in [`field_names`](Self::field_names)
    /// order. `vpar` and `vperp` are in units of `vref`.
    pub(crate) fn append_optional(
        &self,
        row: &mut OutputRow,
        field: &dyn FieldProvider,
        q: Vec3,
        time: f64,
        vpar: f64,
        vperp: f64,
    ) {
        if self.print_cartesian {
            let x = field.metric().to_cartesian(q).unwrap_or([f64::NAN; 3]);
            row.extend_from_slice(&x);
        }
        if self.print_kinetic {
            let scale = self.reference_energy_ev();
            row.push(scale * vpar * vpar);
            row.push(scale * vperp * vperp);
        }
        if self.print_field {
            row.push(field.magnetic_field().magnitude(q, time));
        }
        if self.print_jacobian {
            row.push(field.metric().jacobian(q));
        }
    }
}

fn positive(setting: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(setting, format!("must be finite and > 0, got {value}")))
    }
}

fn invalid(setting: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidSetting { setting, reason }
}
