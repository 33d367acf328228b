//! Uniform electromagnetic field in Cartesian coordinates.

use std::sync::Arc;

use gyre_core::vec3::{is_finite, norm};
use gyre_core::{ConfigError, FieldProvider, Metric, Options, Vec3, VectorField};

use crate::metric::CartesianMetric;

/// A spatially and temporally constant vector field.
pub struct ConstantField {
    metric: Arc<dyn Metric>,
    value: Vec3,
}

impl ConstantField {
    /// Create a constant field over `metric`.
    pub fn new(metric: Arc<dyn Metric>, value: Vec3) -> Self {
        Self { metric, value }
    }
}

impl VectorField for ConstantField {
    fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }

    fn value(&self, _q: Vec3, _time: f64) -> Vec3 {
        self.value
    }

    fn magnitude_gradient(&self, _q: Vec3, _time: f64) -> Vec3 {
        [0.0; 3]
    }
}

/// Constant `B` and optional constant `E`, sharing one Cartesian metric.
///
/// Options: `-bx= -by= -bz=` (default `0 0 1`), `-ex= -ey= -ez=`
/// (the electric field exists only if at least one is given).
pub struct UniformProvider {
    metric: Arc<dyn Metric>,
    magnetic: ConstantField,
    electric: Option<ConstantField>,
}

impl UniformProvider {
    /// Build from explicit field vectors.
    pub fn new(b: Vec3, e: Option<Vec3>) -> Self {
        let metric: Arc<dyn Metric> = Arc::new(CartesianMetric);
        Self {
            magnetic: ConstantField::new(Arc::clone(&metric), b),
            electric: e.map(|e| ConstantField::new(Arc::clone(&metric), e)),
            metric,
        }
    }

    /// Build from `-bx -by -bz -ex -ey -ez`.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let b = [
            options.get_or("bx", 0.0)?,
            options.get_or("by", 0.0)?,
            options.get_or("bz", 1.0)?,
        ];
        if !is_finite(b) || norm(b) == 0.0 {
            return Err(ConfigError::InvalidSetting {
                setting: "bx/by/bz",
                reason: "magnetic field must be finite and non-zero".into(),
            });
        }
        let has_e = ["ex", "ey", "ez"].iter().any(|k| options.contains(k));
        let e = if has_e {
            let e = [
                options.get_or("ex", 0.0)?,
                options.get_or("ey", 0.0)?,
                options.get_or("ez", 0.0)?,
            ];
            if !is_finite(e) {
                return Err(ConfigError::InvalidSetting {
                    setting: "ex/ey/ez",
                    reason: "electric field must be finite".into(),
                });
            }
            Some(e)
        } else {
            None
        };
        Ok(Self::new(b, e))
    }
}

impl FieldProvider for UniformProvider {
    fn name(&self) -> &str {
        "uniform"
    }

    fn magnetic_field(&self) -> &dyn VectorField {
        &self.magnetic
    }

    fn electric_field(&self) -> Option<&dyn VectorField> {
        self.electric.as_ref().map(|e| e as &dyn VectorField)
    }

    fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }
}
