//! Orbit integration and ensemble execution for the Gyre orbit tracer.
//!
//! The [`OrbitIntegrator`] drives one (pusher, observer) pair. The
//! ensemble strategies fan it out over many tasks, each built from a
//! shared option string plus its own private line:
//!
//! - [`Sequential`]: tasks one after another, in input order.
//! - [`ThreadParallel`]: a scoped worker pool with per-task buffers.
//! - [`DistributedWorker`]: one process per shard file, output to a
//!   per-worker file.
//!
//! [`DriverKind`] is the closed registry of top-level drivers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boxes;
pub mod config;
pub mod driver;
pub mod ensemble;
pub mod header;
pub mod integrator;
pub mod task;

pub use boxes::TaskBoxes;
pub use config::EnsembleConfig;
pub use driver::{Driver, DriverError, DriverKind};
pub use ensemble::parallel::ThreadParallel;
pub use ensemble::sequential::Sequential;
pub use ensemble::worker::{DistributedWorker, RedirectedOutput, WorkerRank};
pub use ensemble::{read_ensemble, EnsembleStrategy, Task};
pub use integrator::{OrbitIntegrator, OrbitReport, StopReason};
pub use task::{RunStatus, TaskError, TaskFailure, TaskId};
