//! Parameter range-checking configuration.
//!
//! The legacy classes kept the allowed parameter window and the reaction to a
//! violation (silent / print / throw) in process-wide mutable statics shared by
//! every instance. Here the same three-way policy lives in a small `Copy` value
//! held by each [`Helix`](crate::helix::Helix), immutable after construction, so
//! there is no global state and no cross-thread coupling.

use crate::constants::{Vector5, IDR};

/// Reaction to a helix parameter falling outside the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Mark the helix invalid and continue
    #[default]
    Silent,
    /// Mark the helix invalid and emit a `log::warn!`
    Print,
    /// Fail the mutation with [`PirouetteError::OutOfRange`](crate::pirouette_errors::PirouetteError::OutOfRange)
    Raise,
}

/// Inclusive per-parameter window `[min, max]` for the five helix parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeLimits {
    pub min: Vector5,
    pub max: Vector5,
}

impl RangeLimits {
    pub fn new(min: Vector5, max: Vector5) -> Self {
        Self { min, max }
    }

    /// Index and value of the first out-of-window parameter, if any.
    ///
    /// A NaN parameter compares false against both bounds and is therefore
    /// reported as a violation.
    pub fn first_violation(&self, a: &Vector5) -> Option<(usize, f64)> {
        (IDR..a.len()).find_map(|i| {
            if a[i] >= self.min[i] && a[i] <= self.max[i] {
                None
            } else {
                Some((i, a[i]))
            }
        })
    }
}

/// Validation configuration of a helix instance.
///
/// The default carries no limits: every parameter vector passes and the policy
/// is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CheckConfig {
    limits: Option<RangeLimits>,
    policy: RangePolicy,
}

impl CheckConfig {
    pub fn new(limits: RangeLimits, policy: RangePolicy) -> Self {
        Self {
            limits: Some(limits),
            policy,
        }
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn limits(&self) -> Option<&RangeLimits> {
        self.limits.as_ref()
    }

    /// First limit violation of `a` under this configuration, if any
    pub fn first_violation(&self, a: &Vector5) -> Option<(usize, f64)> {
        self.limits.as_ref().and_then(|l| l.first_violation(a))
    }
}
