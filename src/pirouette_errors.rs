use thiserror::Error;

/// Error taxonomy of the helix algebra.
///
/// The legacy implementation hid dimension mistakes behind a debug-only guard and
/// signalled curvature/range problems through a mix of IEEE special values, stderr
/// prints and optional exceptions. Here every checked entry point reports through
/// this enum; the unchecked evaluators keep the IEEE propagation behavior instead.
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum PirouetteError {
    #[error("Invalid dimension: expected {expected}, got {got}")]
    InvalidDimension { expected: usize, got: usize },

    #[error("Degenerate curvature: kappa is zero or non-finite, the trajectory is a straight line")]
    DegenerateCurvature,

    #[error("Helix parameter {index} = {value} outside the configured limits")]
    OutOfRange { index: usize, value: f64 },
}
