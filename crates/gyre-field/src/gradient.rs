//! Slab field with a linear gradient of |B| along `qu`.

use std::sync::Arc;

use gyre_core::{ConfigError, FieldProvider, Metric, Options, Vec3, VectorField};

use crate::metric::LogicalMetric;

/// `B = b0 (1 + qu / lgrad) ŵ`.
pub struct GradientField {
    metric: Arc<dyn Metric>,
    b0: f64,
    lgrad: f64,
}

impl VectorField for GradientField {
    fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }

    fn value(&self, q: Vec3, _time: f64) -> Vec3 {
        [0.0, 0.0, self.b0 * (1.0 + q[0] / self.lgrad)]
    }

    fn magnitude_gradient(&self, q: Vec3, _time: f64) -> Vec3 {
        let sign = if self.b0 * (1.0 + q[0] / self.lgrad) >= 0.0 {
            1.0
        } else {
            -1.0
        };
        [sign * self.b0 / self.lgrad, 0.0, 0.0]
    }
}

/// Gradient slab in logical coordinates. No electric field, and no
/// Cartesian projection (so `-pxyz` is rejected by pushers).
///
/// Options: `-b0=` (1), `-lgrad=` (1), `-jacobian=` (1).
pub struct GradientProvider {
    metric: Arc<dyn Metric>,
    magnetic: GradientField,
}

impl GradientProvider {
    /// Build from explicit parameters.
    pub fn new(b0: f64, lgrad: f64, jacobian: f64) -> Result<Self, ConfigError> {
        if !b0.is_finite() || b0 == 0.0 {
            return Err(ConfigError::InvalidSetting {
                setting: "b0",
                reason: format!("must be finite and non-zero, got {b0}"),
            });
        }
        if !lgrad.is_finite() || lgrad == 0.0 {
            return Err(ConfigError::InvalidSetting {
                setting: "lgrad",
                reason: format!("must be finite and non-zero, got {lgrad}"),
            });
        }
        if !jacobian.is_finite() || jacobian <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                setting: "jacobian",
                reason: format!("must be finite and positive, got {jacobian}"),
            });
        }
        let metric: Arc<dyn Metric> = Arc::new(LogicalMetric::new(jacobian));
        Ok(Self {
            magnetic: GradientField {
                metric: Arc::clone(&metric),
                b0,
                lgrad,
            },
            metric,
        })
    }

    /// Build from `-b0 -lgrad -jacobian`.
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        Self::new(
            options.get_or("b0", 1.0)?,
            options.get_or("lgrad", 1.0)?,
            options.get_or("jacobian", 1.0)?,
        )
    }
}

impl FieldProvider for GradientProvider {
    fn name(&self) -> &str {
        "gradient"
    }

    fn magnetic_field(&self) -> &dyn VectorField {
        &self.magnetic
    }

    fn electric_field(&self) -> Option<&dyn VectorField> {
        None
    }

    fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_grows_linearly_in_qu() {
        let p = GradientProvider::new(2.0, 4.0, 1.0).unwrap();
        let b = p.magnetic_field();
        assert_eq!(b.magnitude([0.0, 0.0, 0.0], 0.0), 2.0);
        assert_eq!(b.magnitude([4.0, 0.0, 0.0], 0.0), 4.0);
        assert_eq!(b.magnitude_gradient([1.0, 0.0, 0.0], 0.0), [0.5, 0.0, 0.0]);
    }

    #[test]
    fn has_no_cartesian_projection() {
        let p = GradientProvider::from_options(&Options::parse("-jacobian=3")).unwrap();
        assert!(!p.supports_cartesian_projection());
        assert!(p.is_metric_consistent());
        assert_eq!(p.metric().jacobian([0.0; 3]), 3.0);
    }

    #[test]
    fn zero_gradient_length_is_rejected() {
        assert!(GradientProvider::new(1.0, 0.0, 1.0).is_err());
    }
}
