//! Physical constants (CODATA 2018).

/// Elementary charge, in coulomb.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Proton rest mass, in kilogram.
pub const PROTON_MASS: f64 = 1.672_621_923_69e-27;
