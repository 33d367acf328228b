//! Error types for the Gyre orbit tracer.
//!
//! Split by when the failure can happen: [`ConfigError`] is raised while
//! boxes are being built (always before the first step), [`StepError`]
//! while an orbit is being integrated.

use std::error::Error;
use std::fmt;

/// Errors raised while constructing a box from its options.
///
/// A task that hits one of these never starts integrating.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// An option value could not be parsed into the expected type.
    InvalidValue {
        /// Option name, without leading dashes.
        option: String,
        /// The text that failed to parse.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A required option is absent.
    MissingOption {
        /// Option name, without leading dashes.
        option: String,
    },
    /// A box selector names a variant that is not registered.
    UnknownVariant {
        /// Which registry was queried (`field`, `pusher`, ...).
        kind: &'static str,
        /// The requested name.
        name: String,
        /// Names the registry knows about.
        available: Vec<&'static str>,
    },
    /// `tfinal / samples` does not give a finite, positive time step.
    InvalidTimeStep {
        /// Configured integration limit.
        time_final: f64,
        /// Configured number of samples.
        samples: usize,
    },
    /// The electric and magnetic fields do not share one metric.
    InconsistentMetric,
    /// A Cartesian projection was requested from a metric without one.
    CartesianProjectionUnavailable {
        /// Name of the metric that lacks the projection.
        metric: String,
    },
    /// A setting is outside its admissible range.
    InvalidSetting {
        /// Setting name.
        setting: &'static str,
        /// Human-readable description of the violated bound.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                option,
                value,
                reason,
            } => write!(f, "invalid value '{value}' for -{option}: {reason}"),
            Self::MissingOption { option } => write!(f, "missing required option -{option}"),
            Self::UnknownVariant {
                kind,
                name,
                available,
            } => write!(
                f,
                "unknown {kind} '{name}' (available: {})",
                available.join(", ")
            ),
            Self::InvalidTimeStep {
                time_final,
                samples,
            } => write!(
                f,
                "tfinal={time_final} and samples={samples} do not give a positive time step"
            ),
            Self::InconsistentMetric => {
                write!(f, "electric and magnetic fields do not share one metric")
            }
            Self::CartesianProjectionUnavailable { metric } => {
                write!(f, "-pxyz requested but metric '{metric}' has no Cartesian projection")
            }
            Self::InvalidSetting { setting, reason } => {
                write!(f, "invalid setting {setting}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors raised while an orbit is being integrated.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A state component became NaN or infinite.
    NonFinite {
        /// What went non-finite (`position`, `velocity`, ...).
        quantity: &'static str,
        /// Simulated time at which it was detected.
        time: f64,
    },
    /// A pusher returned a time that does not advance.
    NonMonotonicTime {
        /// Time before the push.
        previous: f64,
        /// Time returned by the push.
        next: f64,
    },
    /// Writing an output row failed.
    Output {
        /// Description of the I/O failure.
        reason: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { quantity, time } => {
                write!(f, "{quantity} became non-finite at t={time}")
            }
            Self::NonMonotonicTime { previous, next } => {
                write!(f, "time did not advance: {previous} -> {next}")
            }
            Self::Output { reason } => write!(f, "output failed: {reason}"),
        }
    }
}

impl Error for StepError {}

impl From<std::io::Error> for StepError {
    fn from(e: std::io::Error) -> Self {
        Self::Output {
            reason: e.to_string(),
        }
    }
}
