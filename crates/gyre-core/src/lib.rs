//! Core types and traits for the Gyre orbit tracer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the contracts every box in the workspace is written against: the
//! option set each task is built from, the error taxonomy, the output
//! row types, and the four capability traits ([`Metric`],
//! [`VectorField`], [`FieldProvider`], [`Pusher`]) plus [`Observer`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod observer;
pub mod options;
pub mod output;
pub mod pusher;
pub mod vec3;

pub use error::{ConfigError, StepError};
pub use field::{FieldProvider, Metric, VectorField};
pub use observer::Observer;
pub use options::Options;
pub use output::{FieldNames, NumberFormat, OutputRow};
pub use pusher::Pusher;
pub use vec3::Vec3;
