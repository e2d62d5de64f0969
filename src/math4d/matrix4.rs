use super::vector4::{det3, Vector4, EPSILON};

/// A 4x4 linear map stored as four column vectors.
///
/// Rotation matrices are expected to have orthonormal columns, but nothing
/// keeps them that way: after long chains of composition or slerp, callers
/// re-orthonormalize with [`Matrix4::orthonormalized`] or
/// [`Matrix4::orthonormalized_iterative`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Matrix4 {
    pub cols: [Vector4; 4],
}

const ITERATIVE_ORTHONORMALIZE_STEPS: usize = 4;

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        cols: [Vector4::X, Vector4::Y, Vector4::Z, Vector4::W],
    };
    pub const ZERO: Self = Self {
        cols: [Vector4::ZERO; 4],
    };

    pub const fn from_cols(x: Vector4, y: Vector4, z: Vector4, w: Vector4) -> Self {
        Self { cols: [x, y, z, w] }
    }

    /// Build from `[row][col]` entries.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        let mut m = Self::ZERO;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m.set(r, c, *value);
            }
        }
        m
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cols[col][row]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cols[col][row] = value;
    }

    pub fn row(&self, row: usize) -> Vector4 {
        Vector4::new(
            self.get(row, 0),
            self.get(row, 1),
            self.get(row, 2),
            self.get(row, 3),
        )
    }

    pub fn from_scale(scale: Vector4) -> Self {
        let mut m = Self::ZERO;
        for i in 0..4 {
            m.set(i, i, scale[i]);
        }
        m
    }

    pub fn from_uniform_scale(scale: f64) -> Self {
        Self::from_scale(Vector4::splat(scale))
    }

    /// `a * b^T`.
    pub fn outer(a: Vector4, b: Vector4) -> Self {
        Self::from_cols(a * b.x, a * b.y, a * b.z, a * b.w)
    }

    /// Rotation by `angle` within the plane of axes `axis_a` and `axis_b`
    /// (0 = x .. 3 = w), turning `axis_a` toward `axis_b`.
    ///
    /// Multiples of 90° produce exact 0/±1 entries so axis-aligned turns do
    /// not accumulate drift.
    pub fn plane_rotation(axis_a: usize, axis_b: usize, angle: f64) -> Self {
        let (sin, cos) = snapped_sin_cos(angle);
        let mut m = Self::IDENTITY;
        if axis_a == axis_b || axis_a > 3 || axis_b > 3 {
            log::warn!("plane_rotation: invalid axes {axis_a}, {axis_b}; returning identity");
            return m;
        }
        m.set(axis_a, axis_a, cos);
        m.set(axis_b, axis_a, sin);
        m.set(axis_a, axis_b, -sin);
        m.set(axis_b, axis_b, cos);
        m
    }

    /// Householder reflection through the hyperplane orthogonal to `normal`.
    pub fn reflection(normal: Vector4) -> Self {
        let n = normal.normalize();
        Self::IDENTITY - Self::outer(n, n) * 2.0
    }

    /// Rotation carrying the direction of `from` onto the direction of `to`
    /// within their common plane, built as two reflections. Exactly opposite
    /// inputs yield the point reflection `-I`, which is a proper rotation in
    /// four dimensions.
    pub fn from_to_rotation(from: Vector4, to: Vector4) -> Self {
        let a = from.normalize();
        let b = to.normalize();
        if a.is_near_zero() || b.is_near_zero() {
            return Self::IDENTITY;
        }
        let mid = a + b;
        if mid.length() < 1e-9 {
            return Self::IDENTITY * -1.0;
        }
        Self::reflection(b) * Self::reflection(mid)
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows(std::array::from_fn(|r| self.cols[r].to_array()))
    }

    fn minor(&self, skip_row: usize, skip_col: usize) -> f64 {
        let mut m = [[0.0; 3]; 3];
        let mut out_r = 0;
        for r in 0..4 {
            if r == skip_row {
                continue;
            }
            let mut out_c = 0;
            for c in 0..4 {
                if c == skip_col {
                    continue;
                }
                m[out_r][out_c] = self.get(r, c);
                out_c += 1;
            }
            out_r += 1;
        }
        det3(m)
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self.get(0, c) * self.cofactor(0, c)).sum()
    }

    /// Transposed cofactor matrix.
    pub fn adjugate(&self) -> Self {
        let mut adj = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                adj.set(c, r, self.cofactor(r, c));
            }
        }
        adj
    }

    /// Inverse via the adjugate, or `None` when the matrix is singular.
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }
        Some(self.adjugate() * (1.0 / det))
    }

    /// Inverse that never fails: singular input logs a warning and yields the
    /// identity.
    pub fn inverse(&self) -> Self {
        match self.try_inverse() {
            Some(inv) => inv,
            None => {
                log::warn!(
                    "Matrix4::inverse: singular matrix (det = {:e}), using identity",
                    self.determinant()
                );
                Self::IDENTITY
            }
        }
    }

    pub fn trace(&self) -> f64 {
        (0..4).map(|i| self.get(i, i)).sum()
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.cols.iter().map(|c| c.length_squared()).sum::<f64>().sqrt()
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.approx_eq(*b, tolerance))
    }

    /// Exact Gram-Schmidt over the columns, in order. A column that collapses
    /// is replaced by a perpendicular to the ones before it.
    pub fn orthonormalized(&self) -> Self {
        let mut out = [Vector4::ZERO; 4];
        for i in 0..4 {
            let mut v = self.cols[i];
            for prev in out.iter().take(i) {
                v -= *prev * v.dot(*prev);
            }
            if v.length() < 1e-9 {
                v = Self::completion_axis(&out[..i]);
            }
            out[i] = v.normalize();
        }
        Self { cols: out }
    }

    fn completion_axis(basis: &[Vector4]) -> Vector4 {
        let mut best = Vector4::ZERO;
        for axis in Vector4::AXES {
            let mut v = axis;
            for b in basis {
                v -= *b * v.dot(*b);
            }
            if v.length_squared() > best.length_squared() {
                best = v;
            }
        }
        best
    }

    /// Cheap approximate orthonormalization (Newton-Schulz polar iteration).
    /// Converges quickly for nearly orthonormal input, which is the per-frame
    /// case after a small slerp step.
    pub fn orthonormalized_iterative(&self) -> Self {
        let mut m = *self;
        for _ in 0..ITERATIVE_ORTHONORMALIZE_STEPS {
            m = m * 1.5 - (m * m.transpose() * m) * 0.5;
        }
        m
    }

    /// Spherical interpolation between two rotations via the Cayley transform.
    ///
    /// The relative rotation `R = selfᵀ·other` maps to the skew matrix
    /// `K = (R - I)(R + I)⁻¹`, whose two invariant planes carry magnitudes
    /// `tan(θ/2)`. Each plane is rescaled to `tan(tθ/2)` and mapped back with
    /// `(I + K)(I - K)⁻¹`. Relative rotations of half a turn have no Cayley
    /// image; those fall back to [`Matrix4::slerp_near`].
    pub fn slerp(&self, other: &Self, t: f64) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        let relative = self.transpose() * *other;
        let Some(cayley_denom) = (relative + Self::IDENTITY).try_inverse() else {
            return self.slerp_near(other, t);
        };
        let k = (relative - Self::IDENTITY) * cayley_denom;
        // Clean up the skew part; rounding leaves a small symmetric residue.
        let k = (k - k.transpose()) * 0.5;

        let k2 = k * k;
        let sum_sq = -0.5 * k2.trace();
        let pfaffian = (k.get(0, 1) * k.get(2, 3) - k.get(0, 2) * k.get(1, 3)
            + k.get(0, 3) * k.get(1, 2))
        .abs();
        let disc = (sum_sq * sum_sq - 4.0 * pfaffian * pfaffian).max(0.0).sqrt();
        let a2 = ((sum_sq + disc) * 0.5).max(0.0);
        let b2 = ((sum_sq - disc) * 0.5).max(0.0);
        let (a, b) = (a2.sqrt(), b2.sqrt());

        let scale_for = |mag: f64| {
            if mag < 1e-12 {
                t
            } else {
                (t * mag.atan()).tan() / mag
            }
        };

        let scaled = if (a2 - b2).abs() < 1e-10 {
            k * scale_for(a)
        } else {
            let p_a = (k2 + Self::IDENTITY * b2) * (1.0 / (b2 - a2));
            let p_b = Self::IDENTITY - p_a;
            (k * p_a) * scale_for(a) + (k * p_b) * scale_for(b)
        };

        let Some(back_denom) = (Self::IDENTITY - scaled).try_inverse() else {
            return self.slerp_near(other, t);
        };
        let step = (Self::IDENTITY + scaled) * back_denom;
        (*self * step).orthonormalized_iterative()
    }

    /// Linear blend followed by iterative re-orthonormalization. Only valid
    /// for small angular differences, as between consecutive frames.
    pub fn slerp_near(&self, other: &Self, t: f64) -> Self {
        (*self * (1.0 - t) + *other * t).orthonormalized_iterative()
    }

    /// The two plane angles of a rotation, larger first, recovered from
    /// `tr(R) = 2cos θ1 + 2cos θ2` and `tr(R²) = 2cos 2θ1 + 2cos 2θ2`.
    pub fn rotation_angles(&self) -> (f64, f64) {
        let sum = 0.5 * self.trace();
        let sq_sum = ((*self * *self).trace() + 4.0) * 0.25;
        let product = 0.5 * (sum * sum - sq_sum);
        let disc = (sum * sum - 4.0 * product).max(0.0).sqrt();
        let c1 = ((sum - disc) * 0.5).clamp(-1.0, 1.0);
        let c2 = ((sum + disc) * 0.5).clamp(-1.0, 1.0);
        (c1.acos(), c2.acos())
    }
}

fn snapped_sin_cos(angle: f64) -> (f64, f64) {
    let quarter_turns = angle / std::f64::consts::FRAC_PI_2;
    let nearest = quarter_turns.round();
    if (quarter_turns - nearest).abs() < 1e-12 {
        return match (nearest as i64).rem_euclid(4) {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    angle.sin_cos()
}

impl core::ops::Mul<Vector4> for Matrix4 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl core::ops::Mul<Matrix4> for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        Matrix4 {
            cols: rhs.cols.map(|c| self * c),
        }
    }
}

impl core::ops::Mul<f64> for Matrix4 {
    type Output = Matrix4;
    fn mul(self, rhs: f64) -> Matrix4 {
        Matrix4 {
            cols: self.cols.map(|c| c * rhs),
        }
    }
}

impl core::ops::Add for Matrix4 {
    type Output = Matrix4;
    fn add(self, rhs: Matrix4) -> Matrix4 {
        Matrix4 {
            cols: std::array::from_fn(|i| self.cols[i] + rhs.cols[i]),
        }
    }
}

impl core::ops::Sub for Matrix4 {
    type Output = Matrix4;
    fn sub(self, rhs: Matrix4) -> Matrix4 {
        Matrix4 {
            cols: std::array::from_fn(|i| self.cols[i] - rhs.cols[i]),
        }
    }
}
