//! Analytic Jacobians of the helix evaluation with respect to the five
//! parameters, and the `J · Ea · Jᵗ` covariance propagation built on them.
//!
//! Every matrix here is evaluated at an azimuthal rotation `dphi` from the
//! closest-approach azimuth, with the same trigonometric terms as the
//! corresponding evaluator in [`helix`](crate::helix). Column order is always
//! `(dr, phi0, kappa, dz, tanl)`.
//!
//! Divisions by `kappa` and by `radius + dr'` are left to IEEE arithmetic: for
//! a degenerate helix the entries become Inf/NaN, consistent with the
//! evaluators themselves.

use nalgebra::SMatrix;

use crate::constants::{
    angle_diff, Matrix3x5, Matrix4x5, Matrix5, Matrix7x5, Radian, Vector5, IDR, IPHI0, ITANL,
};
use crate::helix::Helix;

impl Helix {
    /// Propagate the stored parameter covariance through a Jacobian.
    ///
    /// Returns the zero matrix when the covariance has been ignored, never a
    /// stale transform of the zeroed storage.
    pub(crate) fn propagate<const R: usize>(&self, j: &SMatrix<f64, R, 5>) -> SMatrix<f64, R, R> {
        if self.matrix_valid {
            j * self.ea * j.transpose()
        } else {
            SMatrix::zeros()
        }
    }

    /// ∂(parameters about a moved pivot)/∂(parameters about the current pivot).
    ///
    /// `ap` is the parameter vector already re-expressed about the new pivot;
    /// `kappa` and `tanl` are invariant under the move, so their rows are unit
    /// rows. Used as a similarity transform on `Ea` inside
    /// [`set_pivot`](Self::set_pivot).
    pub fn del_ap_del_a(&self, ap: &Vector5) -> Matrix5 {
        let dr = self.a[IDR];
        let phi0 = self.a[IPHI0];
        let tanl_p = ap[ITANL];
        let r = self.radius;
        let r_per_kappa = r / self.kappa();

        let rdr = r + dr;
        let inv_rdr_p = 1.0 / (r + ap[IDR]);
        let dphi = angle_diff(ap[IPHI0], phi0);
        let sin_dphi = dphi.sin();
        let cos_dphi = dphi.cos();

        let mut j = Matrix5::zeros();

        j[(0, 0)] = cos_dphi;
        j[(0, 1)] = rdr * sin_dphi;
        j[(0, 2)] = r_per_kappa * (1.0 - cos_dphi);

        j[(1, 0)] = -inv_rdr_p * sin_dphi;
        j[(1, 1)] = rdr * inv_rdr_p * cos_dphi;
        j[(1, 2)] = r_per_kappa * inv_rdr_p * sin_dphi;

        j[(2, 2)] = 1.0;

        j[(3, 0)] = r * inv_rdr_p * tanl_p * sin_dphi;
        j[(3, 1)] = r * tanl_p * (1.0 - rdr * inv_rdr_p * cos_dphi);
        j[(3, 2)] = r_per_kappa * tanl_p * (dphi - r * inv_rdr_p * sin_dphi);
        j[(3, 3)] = 1.0;
        j[(3, 4)] = -r * dphi;

        j[(4, 4)] = 1.0;

        j
    }

    /// ∂(position)/∂(parameters) at rotation `dphi`, 3×5.
    pub fn del_x_del_a(&self, dphi: Radian) -> Matrix3x5 {
        let dr = self.a[IDR];
        let tanl = self.a[ITANL];
        let r = self.radius;
        let r_per_kappa = r / self.kappa();
        let (cp, sp) = (self.cos_phi0(), self.sin_phi0());

        let phi = self.a[IPHI0] + dphi;
        let cos_f = phi.cos();
        let sin_f = phi.sin();

        let mut j = Matrix3x5::zeros();

        j[(0, 0)] = cp;
        j[(0, 1)] = -dr * sp + r * (-sp + sin_f);
        j[(0, 2)] = -r_per_kappa * (cp - cos_f);

        j[(1, 0)] = sp;
        j[(1, 1)] = dr * cp + r * (cp - cos_f);
        j[(1, 2)] = -r_per_kappa * (sp - sin_f);

        j[(2, 2)] = r_per_kappa * tanl * dphi;
        j[(2, 3)] = 1.0;
        j[(2, 4)] = -r * dphi;

        j
    }

    /// ∂(momentum)/∂(parameters) at rotation `dphi`, 3×5.
    pub fn del_m_del_a(&self, dphi: Radian) -> Matrix3x5 {
        let tanl = self.a[ITANL];
        let pt = self.pt();
        let pt_per_kappa = pt / self.kappa();

        let phi = self.a[IPHI0] + dphi;
        let cos_f = phi.cos();
        let sin_f = phi.sin();

        let mut j = Matrix3x5::zeros();

        j[(0, 1)] = -pt * cos_f;
        j[(0, 2)] = pt_per_kappa * sin_f;

        j[(1, 1)] = -pt * sin_f;
        j[(1, 2)] = -pt_per_kappa * cos_f;

        j[(2, 2)] = -pt_per_kappa * tanl;
        j[(2, 4)] = pt;

        j
    }

    /// ∂(4-momentum)/∂(parameters) at rotation `dphi`, 4×5.
    ///
    /// The energy row follows from the on-shell chain rule through
    /// `E = sqrt(pt²(1 + tanl²) + m²)`.
    pub fn del_4m_del_a(&self, dphi: Radian, mass: f64) -> Matrix4x5 {
        let tanl = self.a[ITANL];
        let pt = self.pt();
        let energy = (pt * pt * (1.0 + tanl * tanl) + mass * mass).sqrt();

        let m = self.del_m_del_a(dphi);

        let mut j = Matrix4x5::zeros();
        j.fixed_view_mut::<3, 5>(0, 0).copy_from(&m);

        j[(3, 2)] = -pt * pt * (1.0 + tanl * tanl) / (self.kappa() * energy);
        j[(3, 4)] = pt * pt * tanl / energy;

        j
    }

    /// Combined ∂(4-momentum, position)/∂(parameters) at rotation `dphi`, 7×5,
    /// for simultaneous propagation of the full `(px, py, pz, E, x, y, z)` state.
    pub fn del_4mx_del_a(&self, dphi: Radian, mass: f64) -> Matrix7x5 {
        let mut j = Matrix7x5::zeros();
        j.fixed_view_mut::<4, 5>(0, 0)
            .copy_from(&self.del_4m_del_a(dphi, mass));
        j.fixed_view_mut::<3, 5>(4, 0)
            .copy_from(&self.del_x_del_a(dphi));
        j
    }
}
