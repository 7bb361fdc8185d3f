//! # Belle-style five-parameter helix
//!
//! A charged-particle trajectory in a uniform solenoid field `Bz`, expressed
//! about a free reference point (the *pivot*) by the five parameters
//! `(dr, phi0, kappa, dz, tanl)`:
//!
//! - `dr`: signed transverse distance of the pivot from the closest-approach point
//! - `phi0`: azimuth of the closest-approach point seen from the helix center
//! - `kappa`: signed curvature, `charge · alpha / pt`
//! - `dz`: z offset of the closest-approach point from the pivot
//! - `tanl`: tangent of the dip angle, `pz / pt`
//!
//! Points along the track are parameterized by the azimuthal rotation `dPhi`
//! from the closest-approach azimuth:
//!
//! ```text
//! x(dPhi) = x0 + dr·cos φ0 + (alpha/kappa)·(cos φ0 − cos(φ0 + dPhi))
//! y(dPhi) = y0 + dr·sin φ0 + (alpha/kappa)·(sin φ0 − sin(φ0 + dPhi))
//! z(dPhi) = z0 + dz − (alpha/kappa)·tanl·dPhi
//! ```
//!
//! with `alpha = 10000 / (c · Bz)` in the (GeV/c, kG, cm) unit system.
//!
//! The derived quantities (`center`, `radius`, `pt`, the phi0 trig values) are
//! recomputed synchronously inside every mutator, so they are always consistent
//! with the current `(pivot, parameters, field)` triple.
//!
//! ## Degenerate curvature
//!
//! `kappa == 0` describes a straight track the parameterization cannot
//! represent. The unchecked constructors and evaluators keep the legacy
//! behavior: `radius` and `pt` become IEEE infinities, the instance is marked
//! invalid through [`is_valid`](Helix::is_valid) and every evaluation
//! propagates Inf/NaN instead of panicking. Callers that prefer an early error
//! use [`try_from_cartesian`](Helix::try_from_cartesian).
//!
//! ## Thread safety
//!
//! `Helix` is a plain value type (`Send + Sync`); the validation configuration
//! is immutable after construction. Concurrent reads of a constructed,
//! non-mutated instance are safe; mutation requires exclusive ownership as
//! usual.

use nalgebra::{Matrix3, Matrix4, Vector4};

use crate::constants::{
    alpha, Centimeter, GeVc, KiloGauss, Matrix5, Matrix7, Radian, Vector5, DEFAULT_B_FIELD, IDR,
    IDZ, IKAPPA, IPHI0, ITANL, PARAMETER_COUNT,
};
use crate::pirouette_errors::PirouetteError;
use crate::range_check::{CheckConfig, RangePolicy};
use crate::three_vector::ThreeVector;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix {
    pub(crate) pivot: ThreeVector,
    pub(crate) a: Vector5,
    pub(crate) ea: Matrix5,
    pub(crate) b_field_z: KiloGauss,
    pub(crate) config: CheckConfig,

    // cache, refreshed by update_cache on every mutation
    pub(crate) alpha: f64,
    pub(crate) center: ThreeVector,
    pub(crate) cos_phi0: f64,
    pub(crate) sin_phi0: f64,
    pub(crate) pt: GeVc,
    pub(crate) radius: Centimeter,
    pub(crate) helix_valid: bool,
    pub(crate) matrix_valid: bool,
}

impl Helix {
    /// Helix from pivot, parameters and their 5×5 covariance.
    pub fn new(pivot: ThreeVector, a: Vector5, ea: Matrix5) -> Self {
        let mut helix = Self {
            pivot,
            a,
            ea,
            b_field_z: DEFAULT_B_FIELD,
            config: CheckConfig::default(),
            alpha: 0.0,
            center: ThreeVector::default(),
            cos_phi0: 0.0,
            sin_phi0: 0.0,
            pt: 0.0,
            radius: 0.0,
            helix_valid: false,
            matrix_valid: true,
        };
        helix.update_cache();
        helix
    }

    /// Helix from pivot and parameters only.
    ///
    /// The covariance is the zero matrix and is flagged not trustworthy: the
    /// `*_with_error` evaluators return zero matrices until a covariance is
    /// supplied through [`set_ea`](Self::set_ea).
    pub fn from_parameters(pivot: ThreeVector, a: Vector5) -> Self {
        let mut helix = Self::new(pivot, a, Matrix5::zeros());
        helix.matrix_valid = false;
        helix
    }

    /// Inverse construction from a lab-frame state.
    ///
    /// Derives parameters such that evaluating the helix at `dPhi = 0`
    /// reproduces `position` and `momentum` exactly: the pivot is placed at
    /// `position` (so `dr = dz = 0`), `phi0` is the momentum azimuth minus
    /// π/2, `kappa = charge · alpha / pt` and `tanl = pz / pt`.
    ///
    /// A momentum with zero transverse component leaves the curvature
    /// undefined; the IEEE division then yields an infinite `kappa` and the
    /// instance is marked invalid, matching the legacy contract. Use
    /// [`try_from_cartesian`](Self::try_from_cartesian) to fail early instead.
    pub fn from_cartesian(position: ThreeVector, momentum: ThreeVector, charge: f64) -> Self {
        Self::from_cartesian_in_field(position, momentum, charge, DEFAULT_B_FIELD)
    }

    /// [`from_cartesian`](Self::from_cartesian) for a non-default field
    /// strength. The curvature is derived with the `alpha` of the given field,
    /// so the `dPhi = 0` state reproduces the inputs in that field.
    pub fn from_cartesian_in_field(
        position: ThreeVector,
        momentum: ThreeVector,
        charge: f64,
        b_field_z: KiloGauss,
    ) -> Self {
        let pt = momentum.pt();
        let a = Vector5::new(
            0.0,
            (-momentum.px()).atan2(momentum.py()),
            charge * alpha(b_field_z) / pt,
            0.0,
            momentum.pz() / pt,
        );
        let mut helix = Self::from_parameters(position, a);
        helix.b_field_z = b_field_z;
        helix.update_cache();
        helix
    }

    /// Checked variant of [`from_cartesian`](Self::from_cartesian).
    pub fn try_from_cartesian(
        position: ThreeVector,
        momentum: ThreeVector,
        charge: f64,
    ) -> Result<Self, PirouetteError> {
        let helix = Self::from_cartesian(position, momentum, charge);
        // zero transverse momentum yields an infinite kappa, zero curvature a
        // non-finite radius; both leave the parameterization undefined
        if helix.a[IKAPPA].is_finite() && helix.a[IKAPPA] != 0.0 {
            Ok(helix)
        } else {
            Err(PirouetteError::DegenerateCurvature)
        }
    }

    /// Install a validation configuration, re-checking the current parameters.
    ///
    /// Fails with `OutOfRange` only under [`RangePolicy::Raise`].
    pub fn with_config(mut self, config: CheckConfig) -> Result<Self, PirouetteError> {
        self.config = config;
        self.update_cache();
        self.enforce_policy()?;
        Ok(self)
    }

    /// Set the field strength at construction time (builder form of
    /// [`set_b_field_z`](Self::set_b_field_z)).
    pub fn with_b_field(mut self, b_field_z: KiloGauss) -> Self {
        self.set_b_field_z(b_field_z);
        self
    }

    // ---------------------------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------------------------

    pub fn pivot(&self) -> ThreeVector {
        self.pivot
    }

    pub fn a(&self) -> &Vector5 {
        &self.a
    }

    pub fn ea(&self) -> &Matrix5 {
        &self.ea
    }

    pub fn dr(&self) -> Centimeter {
        self.a[IDR]
    }

    pub fn phi0(&self) -> Radian {
        self.a[IPHI0]
    }

    pub fn kappa(&self) -> f64 {
        self.a[IKAPPA]
    }

    pub fn dz(&self) -> Centimeter {
        self.a[IDZ]
    }

    pub fn tanl(&self) -> f64 {
        self.a[ITANL]
    }

    pub fn cos_phi0(&self) -> f64 {
        self.cos_phi0
    }

    pub fn sin_phi0(&self) -> f64 {
        self.sin_phi0
    }

    /// Projection of the helix axis onto the z = 0 plane
    pub fn center(&self) -> ThreeVector {
        self.center
    }

    /// Signed curvature radius `alpha / kappa`; infinite for a degenerate helix
    pub fn radius(&self) -> Centimeter {
        self.radius
    }

    /// Alias of [`radius`](Self::radius), the legacy `curv` accessor
    pub fn curv(&self) -> Centimeter {
        self.radius
    }

    /// Transverse momentum magnitude `alpha / |kappa|`
    pub fn pt(&self) -> GeVc {
        self.pt
    }

    pub fn b_field_z(&self) -> KiloGauss {
        self.b_field_z
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Whether the current parameters describe a usable helix (finite nonzero
    /// curvature, inside the configured limits). Evaluating an invalid helix yields
    /// IEEE special values, never a panic.
    pub fn is_valid(&self) -> bool {
        self.helix_valid
    }

    /// Whether the stored covariance is trustworthy. Cleared by
    /// [`ignore_error_matrix`](Self::ignore_error_matrix), set again by
    /// [`set_ea`](Self::set_ea).
    pub fn matrix_valid(&self) -> bool {
        self.matrix_valid
    }

    // ---------------------------------------------------------------------------------------------
    // Evaluation along the track
    // ---------------------------------------------------------------------------------------------

    /// Track position after an azimuthal rotation `dphi` from the
    /// closest-approach azimuth.
    pub fn x(&self, dphi: Radian) -> ThreeVector {
        let phi = self.a[IPHI0] + dphi;
        ThreeVector::new(
            self.pivot.x() + self.a[IDR] * self.cos_phi0 + self.radius * (self.cos_phi0 - phi.cos()),
            self.pivot.y() + self.a[IDR] * self.sin_phi0 + self.radius * (self.sin_phi0 - phi.sin()),
            self.pivot.z() + self.a[IDZ] - self.radius * self.a[ITANL] * dphi,
        )
    }

    /// Raw-array variant of [`x`](Self::x) for callers that avoid the vector type.
    pub fn x_into(&self, dphi: Radian, out: &mut [f64; 3]) {
        let p = self.x(dphi);
        out[0] = p.x();
        out[1] = p.y();
        out[2] = p.z();
    }

    /// Track position together with its propagated 3×3 covariance
    /// `J · Ea · Jᵗ` with `J = ∂x/∂a`.
    ///
    /// The covariance is exactly zero when the error matrix has been ignored.
    pub fn x_with_error(&self, dphi: Radian) -> (ThreeVector, Matrix3<f64>) {
        (self.x(dphi), self.propagate(&self.del_x_del_a(dphi)))
    }

    /// Unit tangent of the track at rotation `dphi`
    pub fn direction(&self, dphi: Radian) -> ThreeVector {
        self.momentum(dphi).unit()
    }

    /// Track momentum after an azimuthal rotation `dphi`.
    ///
    /// The transverse magnitude `alpha/|kappa|` and the z component
    /// `pt · tanl` are independent of `dphi`; only the transverse direction
    /// rotates.
    pub fn momentum(&self, dphi: Radian) -> ThreeVector {
        let phi = self.a[IPHI0] + dphi;
        ThreeVector::new(
            -self.pt * phi.sin(),
            self.pt * phi.cos(),
            self.pt * self.a[ITANL],
        )
    }

    /// Momentum with its propagated 3×3 covariance.
    pub fn momentum_with_error(&self, dphi: Radian) -> (ThreeVector, Matrix3<f64>) {
        (self.momentum(dphi), self.propagate(&self.del_m_del_a(dphi)))
    }

    /// On-shell 4-momentum `(px, py, pz, E)` for the given mass.
    pub fn four_momentum(&self, dphi: Radian, mass: f64) -> Vector4<f64> {
        let p = self.momentum(dphi);
        Vector4::new(p.px(), p.py(), p.pz(), (p.mag2() + mass * mass).sqrt())
    }

    /// 4-momentum with its propagated 4×4 covariance.
    pub fn four_momentum_with_error(&self, dphi: Radian, mass: f64) -> (Vector4<f64>, Matrix4<f64>) {
        (
            self.four_momentum(dphi, mass),
            self.propagate(&self.del_4m_del_a(dphi, mass)),
        )
    }

    /// Simultaneous 4-momentum and position, with the combined 7×7 covariance
    /// of `(px, py, pz, E, x, y, z)`.
    pub fn four_momentum_and_position(
        &self,
        dphi: Radian,
        mass: f64,
    ) -> (Vector4<f64>, ThreeVector, Matrix7) {
        (
            self.four_momentum(dphi, mass),
            self.x(dphi),
            self.propagate(&self.del_4mx_del_a(dphi, mass)),
        )
    }

    // ---------------------------------------------------------------------------------------------
    // Mutators (recompute-on-write)
    // ---------------------------------------------------------------------------------------------

    /// Replace the parameter vector.
    ///
    /// Fails with `OutOfRange` only under [`RangePolicy::Raise`]; the other
    /// policies mark the helix invalid and return `Ok`.
    pub fn set_params(&mut self, a: Vector5) -> Result<(), PirouetteError> {
        self.a = a;
        self.update_cache();
        self.enforce_policy()
    }

    /// Slice-based variant of [`set_params`](Self::set_params) for legacy
    /// callers holding dynamically sized data. Always checks the length.
    pub fn set_params_from_slice(&mut self, a: &[f64]) -> Result<(), PirouetteError> {
        if a.len() != PARAMETER_COUNT {
            return Err(PirouetteError::InvalidDimension {
                expected: PARAMETER_COUNT,
                got: a.len(),
            });
        }
        self.set_params(Vector5::from_row_slice(a))
    }

    /// Replace the parameter covariance and mark it trustworthy again.
    pub fn set_ea(&mut self, ea: Matrix5) {
        self.ea = ea;
        self.matrix_valid = true;
        self.update_cache();
    }

    /// Row-major slice variant of [`set_ea`](Self::set_ea); expects 25 values.
    pub fn set_ea_from_slice(&mut self, ea: &[f64]) -> Result<(), PirouetteError> {
        if ea.len() != PARAMETER_COUNT * PARAMETER_COUNT {
            return Err(PirouetteError::InvalidDimension {
                expected: PARAMETER_COUNT * PARAMETER_COUNT,
                got: ea.len(),
            });
        }
        self.set_ea(Matrix5::from_row_slice(ea));
        Ok(())
    }

    /// Atomic update of pivot, parameters and covariance.
    pub fn set(
        &mut self,
        pivot: ThreeVector,
        a: Vector5,
        ea: Matrix5,
    ) -> Result<(), PirouetteError> {
        self.pivot = pivot;
        self.ea = ea;
        self.matrix_valid = true;
        self.set_params(a)
    }

    /// Move the pivot, re-expressing the parameters about the new point.
    ///
    /// The helix as a space curve is unchanged: `kappa` and `tanl` are
    /// invariant, `dr`, `phi0` and `dz` absorb the move, and the covariance is
    /// transformed by the [`del_ap_del_a`](Self::del_ap_del_a) similarity when
    /// it is valid. The result is undefined for a degenerate helix.
    pub fn set_pivot(&mut self, new_pivot: ThreeVector) -> Result<(), PirouetteError> {
        let dr = self.a[IDR];
        let phi0 = self.a[IPHI0];
        let dz = self.a[IDZ];
        let tanl = self.a[ITANL];
        let r = self.radius;

        // transverse azimuth of the new closest-approach point, seen from the center
        let rdr = dr + r;
        let xc = self.pivot.x() + rdr * self.cos_phi0;
        let yc = self.pivot.y() + rdr * self.sin_phi0;
        let mut csf = (xc - new_pivot.x()) / r;
        let mut snf = (yc - new_pivot.y()) / r;
        let norm = (csf * csf + snf * snf).sqrt();
        let phi = if norm.is_finite() && norm != 0.0 {
            csf /= norm;
            snf /= norm;
            snf.atan2(csf)
        } else {
            csf = 1.0;
            snf = 0.0;
            0.0
        };

        let dphi = crate::constants::angle_diff(phi, phi0);
        let drp = (self.pivot.x() + dr * self.cos_phi0 + r * (self.cos_phi0 - csf)
            - new_pivot.x())
            * csf
            + (self.pivot.y() + dr * self.sin_phi0 + r * (self.sin_phi0 - snf) - new_pivot.y())
                * snf;
        let dzp = self.pivot.z() + dz - r * tanl * dphi - new_pivot.z();

        let ap = Vector5::new(
            drp,
            crate::constants::principal_angle(phi),
            self.a[IKAPPA],
            dzp,
            tanl,
        );

        if self.matrix_valid {
            let j = self.del_ap_del_a(&ap);
            self.ea = j * self.ea * j.transpose();
        }
        self.a = ap;
        self.pivot = new_pivot;
        self.update_cache();
        self.enforce_policy()
    }

    /// Change the field strength; rescales `alpha` and the cached radius/pt.
    pub fn set_b_field_z(&mut self, b_field_z: KiloGauss) {
        self.b_field_z = b_field_z;
        self.update_cache();
    }

    /// Drop the covariance: zero it and mark it not trustworthy.
    ///
    /// Idempotent; every propagated covariance is the zero matrix afterwards.
    pub fn ignore_error_matrix(&mut self) {
        self.ea = Matrix5::zeros();
        self.matrix_valid = false;
    }

    // ---------------------------------------------------------------------------------------------
    // Cache maintenance
    // ---------------------------------------------------------------------------------------------

    /// Recompute every derived quantity from `(pivot, a, b_field_z)`.
    ///
    /// Called synchronously by every mutator; `kappa == 0` leaves `pt` and
    /// `radius` infinite and clears the validity flag, without branching away
    /// from the IEEE arithmetic.
    fn update_cache(&mut self) {
        self.alpha = alpha(self.b_field_z);
        self.cos_phi0 = self.a[IPHI0].cos();
        self.sin_phi0 = self.a[IPHI0].sin();
        self.pt = self.alpha / self.a[IKAPPA].abs();
        self.radius = self.alpha / self.a[IKAPPA];
        self.center = ThreeVector::new(
            self.pivot.x() + (self.a[IDR] + self.radius) * self.cos_phi0,
            self.pivot.y() + (self.a[IDR] + self.radius) * self.sin_phi0,
            0.0,
        );
        let kappa = self.a[IKAPPA];
        self.helix_valid = kappa.is_finite()
            && kappa != 0.0
            && self.config.first_violation(&self.a).is_none();
    }

    /// Apply the configured reaction to a parameter limit violation.
    fn enforce_policy(&mut self) -> Result<(), PirouetteError> {
        if let Some((index, value)) = self.config.first_violation(&self.a) {
            match self.config.policy() {
                RangePolicy::Silent => {}
                RangePolicy::Print => {
                    log::warn!("helix parameter {index} = {value} outside the configured limits")
                }
                RangePolicy::Raise => return Err(PirouetteError::OutOfRange { index, value }),
            }
        }
        Ok(())
    }
}
