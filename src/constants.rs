//! # Constants and type definitions for pirouette
//!
//! This module centralizes the **physical constants**, **unit conventions**, and **common type
//! definitions** used throughout the `pirouette` library.
//!
//! ## Overview
//!
//! - The legacy curvature/momentum conversion constant `alpha`
//! - The default solenoid field strength
//! - Indices of the five helix parameters inside the parameter vector
//! - nalgebra type aliases for the fixed-size vectors, covariances and Jacobians
//!
//! ## Unit conventions
//!
//! All lengths are in **centimeters**, magnetic fields in **kilogauss**, angles in
//! **radians** and momenta in **GeV/c**. These are the historical Belle conventions;
//! the `alpha` formula below is only correct in this unit system.

use nalgebra::{SMatrix, SVector};

// -------------------------------------------------------------------------------------------------
// Unit type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;

/// Length in centimeters
pub type Centimeter = f64;

/// Magnetic field strength in kilogauss (10 kG = 1 T)
pub type KiloGauss = f64;

/// Momentum in GeV/c
pub type GeVc = f64;

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// 2π, useful for angle normalization
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Speed of light factor entering the curvature ↔ momentum conversion
/// in the (GeV/c, kilogauss, centimeter) unit system.
pub const SPEED_OF_LIGHT: f64 = 2.99792458;

/// Numerator of the `alpha` formula. The exact literal is kept to reproduce
/// legacy results bit for bit.
pub const ALPHA_SCALE: f64 = 10000.0;

/// Default solenoid field: 1.5 T, stored in kilogauss.
pub const DEFAULT_B_FIELD: KiloGauss = 15.0;

/// Conversion constant relating signed curvature to transverse momentum.
///
/// Arguments
/// ---------------
/// * `b_field_z`: z-component of the magnetic field in kilogauss
///
/// Return
/// ----------
/// * `alpha = 10000 / (c · Bz)` such that `radius[cm] = alpha / kappa`
pub fn alpha(b_field_z: KiloGauss) -> f64 {
    ALPHA_SCALE / SPEED_OF_LIGHT / b_field_z
}

/// Principal value of an angle in [0, 2π)
pub fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Principal difference between two angles, in [-π, π]
pub fn angle_diff(a: Radian, b: Radian) -> Radian {
    let mut diff = principal_angle(a) - principal_angle(b);
    if diff > std::f64::consts::PI {
        diff -= DPI;
    } else if diff < -std::f64::consts::PI {
        diff += DPI;
    }
    diff
}

// -------------------------------------------------------------------------------------------------
// Helix parameter vector layout
// -------------------------------------------------------------------------------------------------

/// Number of helix parameters
pub const PARAMETER_COUNT: usize = 5;

/// Index of `dr`, the signed distance of the pivot from the helix at closest approach
pub const IDR: usize = 0;

/// Index of `phi0`, the azimuth of the closest-approach point seen from the helix center
pub const IPHI0: usize = 1;

/// Index of `kappa`, the signed curvature
pub const IKAPPA: usize = 2;

/// Index of `dz`, the z offset at closest approach
pub const IDZ: usize = 3;

/// Index of `tanl`, the tangent of the dip angle
pub const ITANL: usize = 4;

// -------------------------------------------------------------------------------------------------
// Fixed-size linear algebra aliases
// -------------------------------------------------------------------------------------------------

/// Helix parameter vector `(dr, phi0, kappa, dz, tanl)`
pub type Vector5 = SVector<f64, 5>;

/// 5×5 covariance of the helix parameters
pub type Matrix5 = SMatrix<f64, 5, 5>;

/// ∂(position)/∂(parameters) Jacobian
pub type Matrix3x5 = SMatrix<f64, 3, 5>;

/// ∂(4-momentum)/∂(parameters) Jacobian
pub type Matrix4x5 = SMatrix<f64, 4, 5>;

/// Combined ∂(4-momentum, position)/∂(parameters) Jacobian
pub type Matrix7x5 = SMatrix<f64, 7, 5>;

/// Propagated covariance of a combined 4-momentum + position state
pub type Matrix7 = SMatrix<f64, 7, 7>;
