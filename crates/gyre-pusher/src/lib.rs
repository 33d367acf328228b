//! Gyron pushers for the Gyre orbit tracer.
//!
//! Two [`Pusher`](gyre_core::Pusher) variants share one settings parser:
//!
//! - [`BorisPusher`]: full-orbit leapfrog with the Boris rotation.
//! - [`GuidingCentrePusher`]: guiding-centre drift equations advanced
//!   by a selectable ODE [`StepperKind`].
//!
//! Pushers work in normalised units: lengths in `lref` metres,
//! velocities in `vref` m/s, time in `lref / vref` seconds. See
//! [`PusherSettings`] for the option set.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod boris;
pub mod guiding_centre;
pub mod registry;
pub mod settings;
pub mod stepper;
pub mod units;

pub use boris::BorisPusher;
pub use guiding_centre::GuidingCentrePusher;
pub use registry::{build_pusher, PusherKind};
pub use settings::PusherSettings;
pub use stepper::StepperKind;
