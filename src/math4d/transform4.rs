use super::matrix4::Matrix4;
use super::vector4::Vector4;

/// Affine map: linear part (rotation and scale) followed by a translation.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Transform4 {
    pub matrix: Matrix4,
    pub translation: Vector4,
}

impl Transform4 {
    pub const IDENTITY: Self = Self {
        matrix: Matrix4::IDENTITY,
        translation: Vector4::ZERO,
    };

    pub fn new(matrix: Matrix4, translation: Vector4) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    pub fn from_translation(translation: Vector4) -> Self {
        Self::new(Matrix4::IDENTITY, translation)
    }

    pub fn transform_point(&self, point: Vector4) -> Vector4 {
        self.matrix * point + self.translation
    }

    pub fn transform_direction(&self, direction: Vector4) -> Vector4 {
        self.matrix * direction
    }

    /// `self ∘ other`: apply `other` first.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
            translation: self.transform_point(other.translation),
        }
    }

    /// Inverse transform. A singular linear part degrades to the identity
    /// (see [`Matrix4::inverse`]).
    pub fn inverse(&self) -> Self {
        let inv = self.matrix.inverse();
        Self {
            matrix: inv,
            translation: -(inv * self.translation),
        }
    }

    /// Frame at `eye` looking toward `target`.
    ///
    /// Columns are right, up, back (away from the target) and ana. Up and ana
    /// come from Gram-Schmidt against the view direction, with +W as the ana
    /// hint; right closes the basis with `make_normal` so the determinant is
    /// +1.
    pub fn look_at(eye: Vector4, target: Vector4, up: Vector4) -> Self {
        let back = (eye - target).normalize();
        let back = if back.is_near_zero() { Vector4::Z } else { back };

        let mut up_axis = up.reject_from_line(back).normalize();
        if up_axis.is_near_zero() {
            up_axis = back.any_perpendicular();
        }

        let mut ana = Vector4::W - Vector4::W.project_onto_plane(back, up_axis);
        ana.normalize_mut();
        if ana.is_near_zero() {
            ana = Matrix4::from_cols(back, up_axis, Vector4::X, Vector4::Y)
                .orthonormalized()
                .cols[2];
        }

        let right = -Vector4::make_normal(up_axis, back, ana);
        Self::new(Matrix4::from_cols(right, up_axis, back, ana), eye)
    }
}

impl core::ops::Mul for Transform4 {
    type Output = Transform4;
    fn mul(self, rhs: Transform4) -> Transform4 {
        self.compose(&rhs)
    }
}
