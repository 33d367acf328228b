//! Observers for the Gyre orbit tracer.
//!
//! An observer is invoked once at time 0 and after every push; its
//! boolean answer decides whether integration continues. Variants:
//!
//! - [`StepRecorder`]: always continues, writes every `skip + 1`-th row.
//! - [`RegionPredicate`]: stops when `qu` leaves `[qumin, qumax]`,
//!   writing boundary rows or delegating in-bounds steps to a
//!   [`StepRecorder`].
//!
//! Observers borrow their output sink for the lifetime of one task.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod region;
pub mod registry;
pub mod step;
pub mod writer;

pub use region::RegionPredicate;
pub use registry::{build_observer, ObserverKind};
pub use step::StepRecorder;
pub use writer::RowWriter;
