//! Test utilities and mock boxes for Gyre development.
//!
//! Provides a mock [`FieldProvider`] ([`MockField`]) with a switchable
//! metric layout, plus the pusher and observer fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use gyre_core::{FieldProvider, Metric, Vec3, VectorField};

pub use fixtures::{DriftPusher, FailingPusher, RecordingObserver};

/// Flat metric with a configurable projection capability.
#[derive(Debug)]
pub struct MockMetric {
    pub cartesian: bool,
}

impl Metric for MockMetric {
    fn name(&self) -> &str {
        if self.cartesian {
            "mock-cartesian"
        } else {
            "mock-logical"
        }
    }

    fn jacobian(&self, _q: Vec3) -> f64 {
        1.0
    }

    fn to_cartesian(&self, q: Vec3) -> Option<Vec3> {
        self.cartesian.then_some(q)
    }

    fn supports_cartesian_projection(&self) -> bool {
        self.cartesian
    }
}

/// A constant vector over a mock metric.
pub struct MockVectorField {
    metric: Arc<dyn Metric>,
    value: Vec3,
}

impl VectorField for MockVectorField {
    fn metric(&self) -> &Arc<dyn Metric> {
        &self.metric
    }

    fn value(&self, _q: Vec3, _time: f64) -> Vec3 {
        self.value
    }
}

/// Mock implementation of [`FieldProvider`].
///
/// Constant `B` along `w`, optional constant `E`. Build with
/// [`inconsistent`](MockField::inconsistent) to give the electric field
/// its own metric instance.
pub struct MockField {
    metric: Arc<dyn Metric>,
    magnetic: MockVectorField,
    electric: Option<MockVectorField>,
}

impl MockField {
    /// Unit `B` along `w`, Cartesian metric, no electric field.
    pub fn new() -> Self {
        Self::with_fields([0.0, 0.0, 1.0], None, true)
    }

    /// Explicit fields sharing one metric.
    pub fn with_fields(b: Vec3, e: Option<Vec3>, cartesian: bool) -> Self {
        let metric: Arc<dyn Metric> = Arc::new(MockMetric { cartesian });
        Self {
            magnetic: MockVectorField {
                metric: Arc::clone(&metric),
                value: b,
            },
            electric: e.map(|value| MockVectorField {
                metric: Arc::clone(&metric),
                value,
            }),
            metric,
        }
    }

    /// Unit `B` on a metric without Cartesian projection.
    pub fn logical() -> Self {
        Self::with_fields([0.0, 0.0, 1.0], None, false)
    }

    /// `B` and `E` on two distinct metric instances.
    pub fn inconsistent() -> Self {
        let metric: Arc<dyn Metric> = Arc::new(MockMetric { cartesian: true });
        Self {
            magnetic: MockVectorField {
                metric: Arc::clone(&metric),
                value: [0.0, 0.0, 1.0],
            },
            electric: Some(MockVectorField {
                metric: Arc::new(MockMetric { cartesian: true }),
                value: [0.0, 0.0, 0.0],
            }),
            metric,
        }
    }
}

impl Default for MockField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldProvider for MockField {
    fn name(&self) -> &str {
        "mock"
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
