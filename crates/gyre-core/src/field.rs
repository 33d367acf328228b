//! Field-provider capability traits.
//!
//! The field physics lives outside this workspace's concern; pushers
//! only see it through these narrow interfaces.

use std::fmt;
use std::sync::Arc;

use crate::vec3::{norm, Vec3};

/// Coordinate metric shared by the fields of one provider.
pub trait Metric: Send + Sync + fmt::Debug {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// `sqrt(det g)` at `q`.
    fn jacobian(&self, q: Vec3) -> f64;

    /// Cartesian position of `q`, when the metric is embedded.
    fn to_cartesian(&self, q: Vec3) -> Option<Vec3>;

    /// Whether [`to_cartesian`](Metric::to_cartesian) is available.
    ///
    /// Pushers query this at construction instead of inspecting the
    /// concrete metric type.
    fn supports_cartesian_projection(&self) -> bool;
}

/// A vector field defined over a [`Metric`].
pub trait VectorField: Send + Sync {
    /// The metric the field components are expressed in.
    fn metric(&self) -> &Arc<dyn Metric>;

    /// Field vector at position `q` and time `time`.
    fn value(&self, q: Vec3, time: f64) -> Vec3;

    /// Field magnitude.
    fn magnitude(&self, q: Vec3, time: f64) -> f64 {
        norm(self.value(q, time))
    }

    /// Gradient of the magnitude, by central differences.
    fn magnitude_gradient(&self, q: Vec3, time: f64) -> Vec3 {
        let mut grad = [0.0; 3];
        for (i, g) in grad.iter_mut().enumerate() {
            let h = 1e-6 * q[i].abs().max(1.0);
            let mut plus = q;
            let mut minus = q;
            plus[i] += h;
            minus[i] -= h;
            *g = (self.magnitude(plus, time) - self.magnitude(minus, time)) / (2.0 * h);
        }
        grad
    }
}

/// Supplies the magnetic field, an optional electric field, and the
/// metric they are expressed in.
pub trait FieldProvider: Send + Sync {
    /// Registry name of the provider.
    fn name(&self) -> &str;

    /// The magnetic field. Always present.
    fn magnetic_field(&self) -> &dyn VectorField;

    /// The electric field, if the model has one.
    fn electric_field(&self) -> Option<&dyn VectorField>;

    /// The provider's metric.
    fn metric(&self) -> &Arc<dyn Metric>;

    /// Whether every exposed field shares the provider's metric.
    ///
    /// Identity, not structural equality: two separately built Cartesian
    /// metrics are not the same metric.
    fn is_metric_consistent(&self) -> bool {
        let metric = self.metric();
        if !Arc::ptr_eq(self.magnetic_field().metric(), metric) {
            return false;
        }
        match self.electric_field() {
            Some(e) => Arc::ptr_eq(e.metric(), metric),
            None => true,
        }
    }

    /// Whether positions can be projected to Cartesian coordinates.
    fn supports_cartesian_projection(&self) -> bool {
        self.metric().supports_cartesian_projection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Flat;

    impl Metric for Flat {
        fn name(&self) -> &str {
            "flat"
        }
        fn jacobian(&self, _q: Vec3) -> f64 {
            1.0
        }
        fn to_cartesian(&self, q: Vec3) -> Option<Vec3> {
            Some(q)
        }
        fn supports_cartesian_projection(&self) -> bool {
            true
        }
    }

    struct Linear {
        metric: Arc<dyn Metric>,
    }

    impl VectorField for Linear {
        fn metric(&self) -> &Arc<dyn Metric> {
            &self.metric
        }
        fn value(&self, q: Vec3, _time: f64) -> Vec3 {
            [0.0, 0.0, 1.0 + 2.0 * q[0]]
        }
    }

    struct Provider {
        metric: Arc<dyn Metric>,
        b: Linear,
        e: Option<Linear>,
    }

    impl FieldProvider for Provider {
        fn name(&self) -> &str {
            "test"
        }
        fn magnetic_field(&self) -> &dyn VectorField {
            &self.b
        }
        fn electric_field(&self) -> Option<&dyn VectorField> {
            self.e.as_ref().map(|e| e as &dyn VectorField)
        }
        fn metric(&self) -> &Arc<dyn Metric> {
            &self.metric
        }
    }

    #[test]
    fn magnitude_gradient_matches_analytic() {
        let field = Linear {
            metric: Arc::new(Flat),
        };
        let g = field.magnitude_gradient([0.5, 0.0, 0.0], 0.0);
        assert!((g[0] - 2.0).abs() < 1e-6);
        assert!(g[1].abs() < 1e-9);
        assert!(g[2].abs() < 1e-9);
    }

    #[test]
    fn shared_metric_is_consistent() {
        let metric: Arc<dyn Metric> = Arc::new(Flat);
        let p = Provider {
            b: Linear {
                metric: Arc::clone(&metric),
            },
            e: Some(Linear {
                metric: Arc::clone(&metric),
            }),
            metric,
        };
        assert!(p.is_metric_consistent());
        assert!(p.supports_cartesian_projection());
    }

    #[test]
    fn distinct_metrics_are_inconsistent() {
        let metric: Arc<dyn Metric> = Arc::new(Flat);
        let p = Provider {
            b: Linear {
                metric: Arc::clone(&metric),
            },
            e: Some(Linear {
                metric: Arc::new(Flat),
            }),
            metric,
        };
        assert!(!p.is_metric_consistent());
    }
}
