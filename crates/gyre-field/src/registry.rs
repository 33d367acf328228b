//! Closed registry of field providers.

use gyre_core::{ConfigError, FieldProvider, Options};
use tracing::debug;

use crate::gradient::GradientProvider;
use crate::uniform::UniformProvider;

/// Every field provider this build knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// [`UniformProvider`].
    Uniform,
    /// [`GradientProvider`].
    Gradient,
}

impl FieldKind {
    /// All variants, in help order.
    pub const ALL: [FieldKind; 2] = [FieldKind::Uniform, FieldKind::Gradient];

    /// Option key selecting the provider.
    pub const OPTION: &'static str = "field";

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Uniform => "uniform",
            FieldKind::Gradient => "gradient",
        }
    }

    /// Look a provider up by name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| ConfigError::UnknownVariant {
                kind: "field",
                name: name.to_string(),
                available: Self::ALL.iter().map(|k| k.name()).collect(),
            })
    }

    /// The provider selected by `-field=` (default `uniform`).
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        match options.get_str(Self::OPTION) {
            Some(name) => Self::from_name(name),
            None => Ok(FieldKind::Uniform),
        }
    }

    /// Usage text for the provider's options.
    pub fn help(self) -> &'static str {
        match self {
            FieldKind::Uniform => {
                "field -> uniform\n\
                 Constant magnetic (and optional electric) field, Cartesian metric.\n\
                 \x20 -bx=, -by=, -bz=   Magnetic field components (default 0 0 1).\n\
                 \x20 -ex=, -ey=, -ez=   Electric field components (absent unless given)."
            }
            FieldKind::Gradient => {
                "field -> gradient\n\
                 Slab field B = b0 (1 + qu/lgrad) along w, logical metric (no -pxyz).\n\
                 \x20 -b0=        Field on axis (default 1).\n\
                 \x20 -lgrad=     Gradient length (default 1).\n\
                 \x20 -jacobian=  Constant metric jacobian (default 1)."
            }
        }
    }

    /// Construct the provider from `options`.
    pub fn build(self, options: &Options) -> Result<Box<dyn FieldProvider>, ConfigError> {
        let provider: Box<dyn FieldProvider> = match self {
            FieldKind::Uniform => Box::new(UniformProvider::from_options(options)?),
            FieldKind::Gradient => Box::new(GradientProvider::from_options(options)?),
        };
        debug!(field = self.name(), "field provider built");
        Ok(provider)
    }
}

/// Build the field provider selected by `options`.
pub fn build_field(options: &Options) -> Result<Box<dyn FieldProvider>, ConfigError> {
    FieldKind::from_options(options)?.build(options)
}
