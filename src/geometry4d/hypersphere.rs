use super::{Shape4D, ShapeKind, SliceSection};
use crate::math4d::Vector4;

/// Solid 4-ball.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hypersphere {
    pub radius: f64,
}

impl Hypersphere {
    pub fn new(radius: f64) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }
}

/// Cross-section of a 4-ball of `radius` by a hyperplane at `w_distance`
/// from its center: `sqrt(r² - d²)`, or `None` once `d >= r`.
pub fn ball_section_radius(radius: f64, w_distance: f64) -> Option<f64> {
    let d = w_distance.abs();
    if d >= radius {
        return None;
    }
    Some((radius * radius - d * d).sqrt())
}

pub(super) fn radial_direction(local: Vector4) -> Vector4 {
    let dir = local.normalize();
    if dir.is_near_zero() {
        Vector4::Y
    } else {
        dir
    }
}

impl Shape4D for Hypersphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Hypersphere
    }

    fn signed_distance(&self, local: Vector4) -> f64 {
        local.length() - self.radius
    }

    fn surface_normal(&self, local: Vector4) -> Vector4 {
        radial_direction(local)
    }

    fn slice(&self, local_w: f64) -> SliceSection {
        match ball_section_radius(self.radius, local_w) {
            Some(radius) => SliceSection::Ball { radius },
            None => SliceSection::Hidden,
        }
    }

    fn w_extent(&self) -> f64 {
        self.radius
    }
}
