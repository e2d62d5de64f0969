use cgmath::{Euler, InnerSpace, Quaternion, Rad, Vector3};

use super::matrix4::Matrix4;
use super::vector4::Vector4;

/// A 4D rotation stored as a pair of unit quaternions acting from the left and
/// from the right: `v ↦ left · v · right`, where the vector `(x, y, z, w)` is
/// read as the quaternion `w + x·i + y·j + z·k`.
///
/// Both factors live on independent copies of the 3-sphere, which is what makes
/// factor-wise slerp a valid interpolation of 4D rotations. `(left, right)` and
/// `(-left, -right)` are the same rotation.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct IsoclinicRotation {
    pub left: Quaternion<f64>,
    pub right: Quaternion<f64>,
}

impl Default for IsoclinicRotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

const UNIT: Quaternion<f64> = Quaternion {
    s: 1.0,
    v: Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    },
};

fn vec_to_quat(v: Vector4) -> Quaternion<f64> {
    Quaternion::new(v.w, v.x, v.y, v.z)
}

fn quat_to_vec(q: Quaternion<f64>) -> Vector4 {
    Vector4::new(q.v.x, q.v.y, q.v.z, q.s)
}

/// Quaternion basis `1, i, j, k` in component order.
fn quat_basis() -> [Quaternion<f64>; 4] {
    [
        Quaternion::new(1.0, 0.0, 0.0, 0.0),
        Quaternion::new(0.0, 1.0, 0.0, 0.0),
        Quaternion::new(0.0, 0.0, 1.0, 0.0),
        Quaternion::new(0.0, 0.0, 0.0, 1.0),
    ]
}

fn quat_from_components(c: [f64; 4]) -> Quaternion<f64> {
    Quaternion::new(c[0], c[1], c[2], c[3])
}

fn matrix_of(f: impl Fn(Quaternion<f64>) -> Quaternion<f64>) -> Matrix4 {
    Matrix4 {
        cols: Vector4::AXES.map(|axis| quat_to_vec(f(vec_to_quat(axis)))),
    }
}

/// Matrix of `v ↦ q · v`.
pub fn left_matrix(q: Quaternion<f64>) -> Matrix4 {
    matrix_of(|v| q * v)
}

/// Matrix of `v ↦ v · q`.
pub fn right_matrix(q: Quaternion<f64>) -> Matrix4 {
    matrix_of(|v| v * q)
}

fn frobenius_dot(a: &Matrix4, b: &Matrix4) -> f64 {
    a.cols.iter().zip(b.cols.iter()).map(|(x, y)| x.dot(*y)).sum()
}

/// Slerp on the unit 3-sphere without the usual hemisphere flip; the caller
/// decides signs for both factors together.
fn slerp_unit(a: Quaternion<f64>, b: Quaternion<f64>, t: f64) -> Quaternion<f64> {
    let cos = a.dot(b).clamp(-1.0, 1.0);
    if cos > 0.9995 {
        return (a * (1.0 - t) + b * t).normalize();
    }
    let theta = cos.acos();
    let sin = theta.sin();
    if sin < 1e-9 {
        // Antipodal: any great circle through `a` works.
        let perp = a * Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let angle = t * std::f64::consts::PI;
        return a * angle.cos() + perp * angle.sin();
    }
    (a * ((1.0 - t) * theta).sin() + b * (t * theta).sin()) * (1.0 / sin)
}

impl IsoclinicRotation {
    pub const IDENTITY: Self = Self {
        left: UNIT,
        right: UNIT,
    };

    pub fn new(left: Quaternion<f64>, right: Quaternion<f64>) -> Self {
        Self {
            left: left.normalize(),
            right: right.normalize(),
        }
    }

    /// Decompose a rotation matrix.
    ///
    /// The sixteen products `left_a · right_b` are read off as Frobenius
    /// projections of `m` onto the basis maps `L(e_a)·R(e_b)`, each of squared
    /// norm 4. The strongest column of that outer product gives the left
    /// factor; the right factor is then the residual `left* · m(1)`.
    pub fn from_matrix(m: &Matrix4) -> Self {
        let basis = quat_basis();
        let mut outer = [[0.0; 4]; 4];
        for (a, ea) in basis.iter().enumerate() {
            for (b, eb) in basis.iter().enumerate() {
                let g = left_matrix(*ea) * right_matrix(*eb);
                outer[a][b] = 0.25 * frobenius_dot(&g, m);
            }
        }

        let column = |b: usize| std::array::from_fn::<f64, 4, _>(|a| outer[a][b]);
        let best = (0..4)
            .max_by(|&i, &j| {
                let ni: f64 = column(i).iter().map(|c| c * c).sum();
                let nj: f64 = column(j).iter().map(|c| c * c).sum();
                ni.total_cmp(&nj)
            })
            .unwrap_or(0);
        let left = quat_from_components(column(best));
        if left.magnitude2() < 1e-18 {
            log::warn!("IsoclinicRotation::from_matrix: matrix is not a rotation, using identity");
            return Self::IDENTITY;
        }
        let left = left.normalize();
        let right = (left.conjugate() * vec_to_quat(*m * Vector4::W)).normalize();
        Self { left, right }
    }

    /// A 3D rotation of the x/y/z subspace, w untouched: the same quaternion
    /// on the left and its inverse on the right.
    pub fn from_euler(x: f64, y: f64, z: f64) -> Self {
        let q = Quaternion::from(Euler {
            x: Rad(x),
            y: Rad(y),
            z: Rad(z),
        });
        Self::from_quaternion_3d(q)
    }

    pub fn from_quaternion_3d(q: Quaternion<f64>) -> Self {
        let q = q.normalize();
        Self {
            left: q,
            right: q.conjugate(),
        }
    }

    /// Rotation carrying `from` onto `to` in their common plane.
    pub fn from_to(from: Vector4, to: Vector4) -> Self {
        Self::from_matrix(&Matrix4::from_to_rotation(from, to))
    }

    pub fn to_matrix(&self) -> Matrix4 {
        left_matrix(self.left) * right_matrix(self.right)
    }

    pub fn apply(&self, v: Vector4) -> Vector4 {
        quat_to_vec(self.left * vec_to_quat(v) * self.right)
    }

    pub fn inverse(&self) -> Self {
        Self {
            left: self.left.conjugate(),
            right: self.right.conjugate(),
        }
    }

    /// `self` followed by `next`.
    ///
    /// `next.left · (self.left · v · self.right) · next.right`, so the left
    /// factors multiply in reverse application order and the right factors in
    /// application order.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            left: next.left * self.left,
            right: self.right * next.right,
        }
    }

    /// Interpolate both factors independently. `other` is first moved onto
    /// the sign representative closest to `self`, flipping both factors
    /// together so the pair still names the same rotation.
    pub fn slerp(&self, other: &Self, t: f64) -> Self {
        let mut target = *other;
        if self.left.dot(target.left) + self.right.dot(target.right) < 0.0 {
            target.left = -target.left;
            target.right = -target.right;
        }
        Self {
            left: slerp_unit(self.left, target.left, t),
            right: slerp_unit(self.right, target.right, t),
        }
    }
}
