//! # pirouette
//!
//! Belle-style five-parameter helix algebra: a closed-form charged-particle
//! trajectory model in a uniform solenoid field, with analytic Jacobians for
//! propagating position, momentum and 4-momentum covariances along the track
//! and across pivot changes.
//!
//! ```rust
//! use pirouette::helix::Helix;
//! use pirouette::three_vector::ThreeVector;
//!
//! // a 1 GeV/c positive track leaving the origin along +x
//! let helix = Helix::from_cartesian(
//!     ThreeVector::new(0.0, 0.0, 0.0),
//!     ThreeVector::new(1.0, 0.0, 0.3),
//!     1.0,
//! );
//!
//! // the state at dPhi = 0 reproduces the construction input
//! assert!((helix.momentum(0.0).px() - 1.0).abs() < 1e-12);
//! assert!(helix.is_valid());
//! ```

pub mod constants;
pub mod helix;
mod jacobian;
pub mod pirouette_errors;
pub mod range_check;
pub mod three_vector;
