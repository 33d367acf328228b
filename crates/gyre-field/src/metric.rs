//! Concrete metrics.

use gyre_core::{Metric, Vec3};

/// Euclidean metric; positions already are Cartesian.
#[derive(Clone, Copy, Debug, Default)]
pub struct CartesianMetric;

impl Metric for CartesianMetric {
    fn name(&self) -> &str {
        "cartesian"
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

/// Normalised logical coordinates with a constant volume element and
/// no known embedding in Cartesian space.
#[derive(Clone, Copy, Debug)]
pub struct LogicalMetric {
    jacobian: f64,
}

impl LogicalMetric {
    /// Create a logical metric with the given constant jacobian.
    pub fn new(jacobian: f64) -> Self {
        Self { jacobian }
    }
}

impl Metric for LogicalMetric {
    fn name(&self) -> &str {
        "logical"
    }

    fn jacobian(&self, _q: Vec3) -> f64 {
        self.jacobian
    }

    fn to_cartesian(&self, _q: Vec3) -> Option<Vec3> {
        None
    }

    fn supports_cartesian_projection(&self) -> bool {
        false
    }
}
