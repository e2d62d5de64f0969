use cgmath::Vector3;
use serde::{Deserialize, Serialize};

/// Lengths and determinants below this are treated as zero.
pub const EPSILON: f64 = 1e-9;

/// A point or direction in 4D space. The w component is the hidden axis.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const AXES: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::W];

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn from_array(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Embed a 3D vector at the given w.
    pub fn from_xyz(v: Vector3<f64>, w: f64) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// Drop the w component.
    pub fn xyz(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero when the length is below
    /// [`EPSILON`].
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len < EPSILON {
            return Self::ZERO;
        }
        self / len
    }

    /// In-place variant of [`Vector4::normalize`].
    pub fn normalize_mut(&mut self) {
        *self = self.normalize();
    }

    pub fn is_near_zero(self) -> bool {
        self.length_squared() < EPSILON * EPSILON
    }

    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self - other).to_array().iter().all(|d| d.abs() <= tolerance)
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs(), self.w.abs())
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.lerp_unclamped(other, t.clamp(0.0, 1.0))
    }

    pub fn lerp_unclamped(self, other: Self, t: f64) -> Self {
        self + (other - self) * t
    }

    /// Cosine of the angle between two vectors, clamped to [-1, 1]. Zero
    /// vectors give 1.0 (no rotation needed).
    pub fn cos_angle(self, other: Self) -> f64 {
        let denom = self.length() * other.length();
        if denom < EPSILON {
            return 1.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0)
    }

    pub fn angle(self, other: Self) -> f64 {
        self.cos_angle(other).acos()
    }

    /// Projection onto the line spanned by `dir`.
    pub fn project_onto_line(self, dir: Self) -> Self {
        let denom = dir.length_squared();
        if denom < EPSILON {
            return Self::ZERO;
        }
        dir * (self.dot(dir) / denom)
    }

    /// Component perpendicular to `dir`.
    pub fn reject_from_line(self, dir: Self) -> Self {
        self - self.project_onto_line(dir)
    }

    /// Projection onto the plane spanned by `a` and `b` (not necessarily
    /// orthogonal). Solves the 2x2 Gram system; zero if `a`, `b` are parallel.
    pub fn project_onto_plane(self, a: Self, b: Self) -> Self {
        let (aa, ab, bb) = (a.dot(a), a.dot(b), b.dot(b));
        let det = aa * bb - ab * ab;
        if det.abs() < EPSILON {
            return Self::ZERO;
        }
        let (va, vb) = (self.dot(a), self.dot(b));
        let ca = (va * bb - vb * ab) / det;
        let cb = (vb * aa - va * ab) / det;
        a * ca + b * cb
    }

    /// Projection onto the 3-space spanned by `a`, `b` and `c`. Solves the
    /// 3x3 Gram system with Cramer's rule; zero if the basis is degenerate.
    pub fn project_onto_space(self, a: Self, b: Self, c: Self) -> Self {
        let g = [
            [a.dot(a), a.dot(b), a.dot(c)],
            [b.dot(a), b.dot(b), b.dot(c)],
            [c.dot(a), c.dot(b), c.dot(c)],
        ];
        let det = det3(g);
        if det.abs() < EPSILON {
            return Self::ZERO;
        }
        let rhs = [self.dot(a), self.dot(b), self.dot(c)];
        let mut coeffs = [0.0; 3];
        for (col, coeff) in coeffs.iter_mut().enumerate() {
            let mut m = g;
            for row in 0..3 {
                m[row][col] = rhs[row];
            }
            *coeff = det3(m) / det;
        }
        a * coeffs[0] + b * coeffs[1] + c * coeffs[2]
    }

    /// Unit vector perpendicular to `self`, seeded from the world axis least
    /// aligned with it.
    pub fn any_perpendicular(self) -> Self {
        let dir = self.normalize();
        if dir.is_near_zero() {
            return Self::X;
        }
        let seed = Self::least_aligned_axis(dir, &Self::AXES);
        (seed - dir * seed.dot(dir)).normalize()
    }

    /// Unit vector perpendicular to `self` with its seed drawn from X, Y and Z
    /// only, so it has no w component whenever `self` has none. X when `self`
    /// is zero.
    pub fn perpendicular_in_slice(self) -> Self {
        let dir = self.normalize();
        if dir.is_near_zero() {
            return Self::X;
        }
        let seed = Self::least_aligned_axis(dir, &[Self::X, Self::Y, Self::Z]);
        let perp = (seed - dir * seed.dot(dir)).normalize();
        if perp.is_near_zero() {
            Self::X
        } else {
            perp
        }
    }

    /// Axis among `axes` with the smallest absolute dot product against `dir`.
    /// Ties go to the earliest.
    pub fn least_aligned_axis(dir: Self, axes: &[Self]) -> Self {
        let mut best = Self::X;
        let mut best_dot = f64::INFINITY;
        for &axis in axes {
            let d = axis.dot(dir).abs();
            if d < best_dot {
                best_dot = d;
                best = axis;
            }
        }
        best
    }

    /// Rotate `self` toward `target` by at most `max_angle` radians, keeping
    /// the length of `self`.
    pub fn rotate_toward(self, target: Self, max_angle: f64) -> Self {
        let len = self.length();
        let from = self.normalize();
        let to = target.normalize();
        if from.is_near_zero() || to.is_near_zero() {
            return self;
        }
        let angle = from.angle(to);
        if angle <= max_angle {
            return to * len;
        }
        let mut perp = to - from * from.dot(to);
        if perp.length() < 1e-6 {
            // Anti-parallel: every perpendicular is a shortest path.
            perp = from.any_perpendicular();
        }
        let perp = perp.normalize();
        (from * max_angle.cos() + perp * max_angle.sin()) * len
    }

    /// Vector perpendicular to `a`, `b` and `c`: the 4D analogue of the cross
    /// product. Satisfies `make_normal(a, b, c).dot(d) == det[a; b; c; d]`,
    /// so `make_normal(X, Y, Z) == W`.
    pub fn make_normal(a: Self, b: Self, c: Self) -> Self {
        let (a, b, c) = (a.to_array(), b.to_array(), c.to_array());
        let minor = |skip: usize| {
            let mut m = [[0.0; 3]; 3];
            for (row, v) in [a, b, c].iter().enumerate() {
                let mut col = 0;
                for (i, value) in v.iter().enumerate() {
                    if i == skip {
                        continue;
                    }
                    m[row][col] = *value;
                    col += 1;
                }
            }
            det3(m)
        };
        Self::new(-minor(0), minor(1), -minor(2), minor(3))
    }

}

pub(crate) fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

impl core::ops::Index<usize> for Vector4 {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vector4 index out of bounds: {index}"),
        }
    }
}

impl core::ops::IndexMut<usize> for Vector4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vector4 index out of bounds: {index}"),
        }
    }
}

impl core::ops::Add for Vector4 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl core::ops::AddAssign for Vector4 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::ops::Sub for Vector4 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl core::ops::SubAssign for Vector4 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl core::ops::Mul<f64> for Vector4 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

impl core::ops::Mul<Vector4> for f64 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        rhs * self
    }
}

impl core::ops::MulAssign<f64> for Vector4 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl core::ops::Div<f64> for Vector4 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs, self.w / rhs)
    }
}

impl core::ops::Neg for Vector4 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl From<[f64; 4]> for Vector4 {
    fn from(value: [f64; 4]) -> Self {
        Self::from_array(value)
    }
}

impl From<Vector4> for [f64; 4] {
    fn from(value: Vector4) -> Self {
        value.to_array()
    }
}

impl From<cgmath::Vector4<f64>> for Vector4 {
    fn from(value: cgmath::Vector4<f64>) -> Self {
        Self::new(value.x, value.y, value.z, value.w)
    }
}

impl From<Vector4> for cgmath::Vector4<f64> {
    fn from(value: Vector4) -> Self {
        cgmath::Vector4::new(value.x, value.y, value.z, value.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn normalize_produces_unit_length() {
        for v in [
            Vector4::new(3.0, -4.0, 12.0, 0.5),
            Vector4::new(1e-4, 0.0, 0.0, 0.0),
            Vector4::new(-7.0, 2.0, 2.0, -9.0),
        ] {
            assert!((v.normalize().length() - 1.0).abs() < TOL);
        }
    }

    #[test]
    fn normalize_zero_stays_zero() {
        assert_eq!(Vector4::ZERO.normalize(), Vector4::ZERO);
        let mut tiny = Vector4::splat(1e-12);
        tiny.normalize_mut();
        assert_eq!(tiny, Vector4::ZERO);
    }

    #[test]
    fn make_normal_is_orthogonal_to_inputs() {
        let a = Vector4::new(1.0, 2.0, -0.5, 0.3);
        let b = Vector4::new(-0.7, 0.1, 1.4, 2.0);
        let c = Vector4::new(0.2, -1.1, 0.9, -0.4);
        let n = Vector4::make_normal(a, b, c);
        assert!(n.length() > 1e-3);
        assert!(n.dot(a).abs() < TOL);
        assert!(n.dot(b).abs() < TOL);
        assert!(n.dot(c).abs() < TOL);
    }

    #[test]
    fn make_normal_is_right_handed() {
        assert_eq!(
            Vector4::make_normal(Vector4::X, Vector4::Y, Vector4::Z),
            Vector4::W
        );
        assert_eq!(
            Vector4::make_normal(Vector4::Y, Vector4::Z, Vector4::W),
            -Vector4::X
        );
        // Swapping two inputs flips the result.
        assert_eq!(
            Vector4::make_normal(Vector4::Y, Vector4::X, Vector4::Z),
            -Vector4::W
        );
    }

    #[test]
    fn lerp_clamps_but_unclamped_extrapolates() {
        let a = Vector4::ZERO;
        let b = Vector4::ONE;
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp_unclamped(b, 2.0), Vector4::splat(2.0));
        assert_eq!(a.lerp(b, 0.25), Vector4::splat(0.25));
    }

    #[test]
    fn cos_angle_is_clamped() {
        let v = Vector4::new(0.1, 0.2, 0.3, 0.4);
        let c = v.cos_angle(v * 3.0);
        assert!(c <= 1.0);
        assert!(v.angle(v * 3.0).is_finite());
        assert!((Vector4::X.angle(-Vector4::X) - std::f64::consts::PI).abs() < TOL);
    }

    #[test]
    fn plane_projection_matches_subspace() {
        let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        let p = v.project_onto_plane(Vector4::X, Vector4::X + Vector4::Y);
        assert!(p.approx_eq(Vector4::new(1.0, 2.0, 0.0, 0.0), TOL));
        let parallel = v.project_onto_plane(Vector4::X, Vector4::X * 2.0);
        assert_eq!(parallel, Vector4::ZERO);
    }

    #[test]
    fn space_projection_drops_missing_axis() {
        let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        let p = v.project_onto_space(Vector4::X, Vector4::Y + Vector4::Z, Vector4::W);
        assert!(p.approx_eq(Vector4::new(1.0, 2.5, 2.5, 4.0), TOL));
        let degenerate =
            v.project_onto_space(Vector4::X, Vector4::Y, Vector4::X + Vector4::Y);
        assert_eq!(degenerate, Vector4::ZERO);
    }

    #[test]
    fn rotate_toward_limits_step() {
        let step = 0.1;
        let r = (Vector4::X * 2.0).rotate_toward(Vector4::Y, step);
        assert!((r.length() - 2.0).abs() < TOL);
        assert!((r.angle(Vector4::X) - step).abs() < 1e-9);
        let done = Vector4::X.rotate_toward(Vector4::Y, 10.0);
        assert!(done.approx_eq(Vector4::Y, TOL));
    }

    #[test]
    fn rotate_toward_handles_anti_parallel() {
        let r = Vector4::Z.rotate_toward(-Vector4::Z, 0.5);
        assert!(r.to_array().iter().all(|c| c.is_finite()));
        assert!((r.angle(Vector4::Z) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn any_perpendicular_is_unit_and_orthogonal() {
        for v in Vector4::AXES.iter().copied().chain([Vector4::ONE]) {
            let p = v.any_perpendicular();
            assert!((p.length() - 1.0).abs() < TOL);
            assert!(p.dot(v).abs() < TOL);
        }
    }

    #[test]
    fn perpendicular_in_slice_keeps_w_at_zero() {
        for v in [
            Vector4::new(3.0, 10.0, 2.0, 0.0),
            Vector4::new(-1.0, 1.0, 1.0, 0.0),
            Vector4::Y,
        ] {
            let p = v.perpendicular_in_slice();
            assert_eq!(p.w, 0.0, "perpendicular of {v:?} left the slice");
            assert!((p.length() - 1.0).abs() < TOL);
            assert!(p.dot(v).abs() < TOL);
        }
        assert_eq!(Vector4::W.perpendicular_in_slice(), Vector4::X);
        assert_eq!(Vector4::ZERO.perpendicular_in_slice(), Vector4::X);
    }

    #[test]
    fn index_reads_and_writes_components() {
        let mut v = Vector4::new(1.0, 2.0, 3.0, 4.0);
        v[3] = 9.0;
        assert_eq!((v[0], v[1], v[2], v[3]), (1.0, 2.0, 3.0, 9.0));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_past_w_panics() {
        let v = Vector4::ONE;
        let _ = v[4];
    }
}
