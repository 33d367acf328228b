//! Closed registry of observer variants.

use std::io::Write;

use gyre_core::{ConfigError, Observer, Options};

use crate::region::RegionPredicate;
use crate::step::StepRecorder;

/// Every observer this build knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverKind {
    /// [`StepRecorder`].
    Step,
    /// [`RegionPredicate`].
    Region,
}

impl ObserverKind {
    /// All variants, in help order.
    pub const ALL: [ObserverKind; 2] = [ObserverKind::Step, ObserverKind::Region];

    /// Option key selecting the observer.
    pub const OPTION: &'static str = "observer";

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            ObserverKind::Step => "step",
            ObserverKind::Region => "region",
        }
    }

    /// Look an observer up by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "observer",
                name: name.to_string(),
                available: Self::ALL.iter().map(|k| k.name()).collect(),
            })
    }

    /// The observer selected by `-observer=` (default `step`).
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        match options.get_str(Self::OPTION) {
            Some(name) => Self::from_name(name),
            None => Ok(ObserverKind::Step),
        }
    }

    /// Usage text.
    pub fn help(self) -> &'static str {
        match self {
            ObserverKind::Step => {
                "observer -> step\n\
                 Writes the pusher state every skip+1 steps; never stops integration.\n\
                 \x20 -skip=          Steps skipped between rows (default 0).\n\
                 \x20 -skip-initial   Also skip the first skip steps, starting at t=0."
            }
            ObserverKind::Region => {
                "observer -> region\n\
                 Stops integration once qu leaves [qumin, qumax]. By default writes the\n\
                 state at t=0 (if inside) and once more at the first step with t>=tfinal\n\
                 or outside the bounds.\n\
                 \x20 -qumin=, -qumax=  Position limits (default lowest/largest double).\n\
                 \x20 -step-mode        Delegate every in-bounds step to the step observer\n\
                 \x20                   (step options apply)."
            }
        }
    }

    /// Construct the observer over `out`.
    pub fn build<'w>(
        self,
        options: &Options,
        out: &'w mut dyn Write,
    ) -> Result<Box<dyn Observer + 'w>, ConfigError> {
        Ok(match self {
            ObserverKind::Step => Box::new(StepRecorder::from_options(options, out)?),
            ObserverKind::Region => Box::new(RegionPredicate::from_options(options, out)?),
        })
    }
}

/// Build the observer selected by `options` over `out`.
pub fn build_observer<'w>(
    options: &Options,
    out: &'w mut dyn Write,
) -> Result<Box<dyn Observer + 'w>, ConfigError> {
    ObserverKind::from_options(options)?.build(options, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_step() {
        let mut out = Vec::new();
        let obs = build_observer(&Options::parse(""), &mut out).unwrap();
        assert_eq!(obs.name(), "step");
    }

    #[test]
    fn region_by_name() {
        let mut out = Vec::new();
        let obs = build_observer(&Options::parse("-observer=region -qumax=1"), &mut out).unwrap();
        assert_eq!(obs.name(), "region");
    }

    #[test]
    fn malformed_skip_is_config_error() {
        let mut out = Vec::new();
        let err = build_observer(&Options::parse("-skip=two"), &mut out).err();
        assert!(matches!(err, Some(ConfigError::InvalidValue { .. })));
    }
}
