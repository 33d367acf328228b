//! Reference field providers for the Gyre orbit tracer.
//!
//! Field physics is an external concern; these providers are the
//! minimal models needed to drive the engine end to end:
//!
//! - [`UniformProvider`]: constant B (and optional E) in Cartesian
//!   coordinates.
//! - [`GradientProvider`]: slab field with a linear |B| gradient in
//!   logical coordinates that have no Cartesian embedding.
//!
//! Providers are selected through the closed [`FieldKind`] registry.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod gradient;
pub mod metric;
pub mod registry;
pub mod uniform;

pub use gradient::GradientProvider;
pub use metric::{CartesianMetric, LogicalMetric};
pub use registry::{build_field, FieldKind};
pub use uniform::{ConstantField, UniformProvider};
