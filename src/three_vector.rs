use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use nalgebra::Vector3;

use crate::constants::Radian;

/// Cartesian 3-vector with the physics-standard derived quantities.
///
/// Used both as a point (pivot, evaluated track position) and as a momentum
/// vector. All derived quantities are computed on demand; the component order
/// is `(x, y, z)` with the beam axis along z.
///
/// Degenerate inputs follow IEEE-754: `theta`/`eta` are NaN/infinite at the
/// poles and `unit()` on the zero vector produces NaNs. None of the accessors
/// panic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThreeVector {
    x: f64,
    y: f64,
    z: f64,
}

impl ThreeVector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Alias of [`x`](Self::x) for momentum vectors
    pub fn px(&self) -> f64 {
        self.x
    }

    /// Alias of [`y`](Self::y) for momentum vectors
    pub fn py(&self) -> f64 {
        self.y
    }

    /// Alias of [`z`](Self::z) for momentum vectors
    pub fn pz(&self) -> f64 {
        self.z
    }

    /// Squared magnitude
    pub fn mag2(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude
    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Alias of [`mag`](Self::mag) for momentum vectors
    pub fn p(&self) -> f64 {
        self.mag()
    }

    /// Transverse (xy-plane) magnitude
    pub fn pt(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Alias of [`pt`](Self::pt): cylindrical radius of a point
    pub fn r(&self) -> f64 {
        self.pt()
    }

    /// Azimuthal angle `atan2(y, x)` in (-π, π]
    pub fn phi(&self) -> Radian {
        self.y.atan2(self.x)
    }

    /// Polar angle `atan2(pt, z)` in [0, π]
    pub fn theta(&self) -> Radian {
        self.pt().atan2(self.z)
    }

    /// Pseudorapidity `-ln(tan(theta/2))`; infinite on the z axis
    pub fn eta(&self) -> f64 {
        -(self.theta() / 2.0).tan().ln()
    }

    /// Indexed component access: 0 → x, 1 → y, 2 → z.
    ///
    /// Any other index returns NaN. This is a silent-NaN contract inherited
    /// from the legacy class, not an error path.
    pub fn component(&self, index: usize) -> f64 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => f64::NAN,
        }
    }

    pub fn set_values(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Unit vector along `self`
    pub fn unit(&self) -> ThreeVector {
        let m = self.mag();
        ThreeVector::new(self.x / m, self.y / m, self.z / m)
    }

    /// Dot product
    pub fn dot(&self, other: &ThreeVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

impl Add for ThreeVector {
    type Output = ThreeVector;

    fn add(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for ThreeVector {
    type Output = ThreeVector;

    fn sub(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for ThreeVector {
    type Output = ThreeVector;

    fn neg(self) -> ThreeVector {
        ThreeVector::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for ThreeVector {
    fn add_assign(&mut self, rhs: ThreeVector) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for ThreeVector {
    fn sub_assign(&mut self, rhs: ThreeVector) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign<f64> for ThreeVector {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

/// Dot product
impl Mul for ThreeVector {
    type Output = f64;

    fn mul(self, rhs: ThreeVector) -> f64 {
        self.dot(&rhs)
    }
}

impl Mul<f64> for ThreeVector {
    type Output = ThreeVector;

    fn mul(self, rhs: f64) -> ThreeVector {
        ThreeVector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<ThreeVector> for f64 {
    type Output = ThreeVector;

    fn mul(self, rhs: ThreeVector) -> ThreeVector {
        rhs * self
    }
}

impl fmt::Display for ThreeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<Vector3<f64>> for ThreeVector {
    fn from(v: Vector3<f64>) -> Self {
        ThreeVector::new(v.x, v.y, v.z)
    }
}

impl From<ThreeVector> for Vector3<f64> {
    fn from(v: ThreeVector) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
