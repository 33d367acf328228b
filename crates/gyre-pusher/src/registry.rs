//! Closed registry of pusher variants.

use gyre_core::{ConfigError, FieldProvider, Options, Pusher};
use tracing::debug;

use crate::boris::BorisPusher;
use crate::guiding_centre::GuidingCentrePusher;
use crate::settings::PusherSettings;

/// Every pusher this build knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PusherKind {
    /// [`BorisPusher`].
    Boris,
    /// [`GuidingCentrePusher`].
    GuidingCentre,
}

impl PusherKind {
    /// All variants, in help order.
    pub const ALL: [PusherKind; 2] = [PusherKind::Boris, PusherKind::GuidingCentre];

    /// Option key selecting the pusher.
    pub const OPTION: &'static str = "pusher";

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            PusherKind::Boris => "boris",
            PusherKind::GuidingCentre => "guiding-centre",
        }
    }

    /// Look a pusher up by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "pusher",
                name: name.to_string(),
                available: Self::ALL.iter().map(|k| k.name()).collect(),
            })
    }

    /// The pusher selected by `-pusher=` (default `boris`).
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        match options.get_str(Self::OPTION) {
            Some(name) => Self::from_name(name),
            None => Ok(PusherKind::Boris),
        }
    }

    /// Usage text.
    pub fn help(self) -> &'static str {
        match self {
            PusherKind::Boris => {
                "pusher -> boris\n\
                 Full-orbit leapfrog pusher with the Boris rotation.\n\
                 Fields: t qu qv qw vx vy vz [x y z] [Epar Eperp] [B] [jac]"
            }
            PusherKind::GuidingCentre => {
                "pusher -> guiding-centre\n\
                 Guiding-centre drift pusher (E x B, grad-B, mirror force).\n\
                 \x20 -stepper=   euler | heun | rungekutta (default rungekutta).\n\
                 Fields: t qu qv qw vpar [x y z] [Epar Eperp] [B] [jac]"
            }
        }
    }

    /// Settings shared by every pusher.
    pub fn settings_help() -> &'static str {
        "pusher settings\n\
         \x20 -samples=      Steps per tfinal (default 512).\n\
         \x20 -tfinal=       Integration limit, normalised time (default 1).\n\
         \x20 -lref=         Reference length in m (default 1).\n\
         \x20 -vref=         Reference speed in m/s (default 1).\n\
         \x20 -mass=         Mass in proton masses (default 1).\n\
         \x20 -charge=       Charge in proton charges (default 1).\n\
         \x20 -qu= -qv= -qw= Initial position (default 0.1 0 0).\n\
         \x20 -energy=       Kinetic energy in eV (default 1).\n\
         \x20 -pitch=        Pitch v_par/v (default 0.5).\n\
         \x20 -gyrophase=    Initial gyrophase in rad (default 0).\n\
         \x20 -pxyz -pkin -pb -pjac   Extra output columns.\n\
         \x20 -phires        16-digit scientific output."
    }

    /// Construct the pusher, taking ownership of `field`.
    pub fn build(
        self,
        options: &Options,
        field: Box<dyn FieldProvider>,
    ) -> Result<Box<dyn Pusher>, ConfigError> {
        let settings = PusherSettings::from_options(options)?;
        let pusher: Box<dyn Pusher> = match self {
            PusherKind::Boris => Box::new(BorisPusher::new(settings, field)?),
            PusherKind::GuidingCentre => Box::new(GuidingCentrePusher::new(settings, field)?),
        };
        debug!(pusher = self.name(), dt = pusher.time_step(), "pusher built");
        Ok(pusher)
    }
}

/// Build the pusher selected by `options` over `field`.
pub fn build_pusher(
    options: &Options,
    field: Box<dyn FieldProvider>,
) -> Result<Box<dyn Pusher>, ConfigError> {
    PusherKind::from_options(options)?.build(options, field)
}
