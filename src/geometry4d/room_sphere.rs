use super::hypersphere::{ball_section_radius, radial_direction};
use super::{Shape4D, ShapeKind, SliceSection};
use crate::math4d::Vector4;

/// Hollow hypersphere walked from the inside.
///
/// Distance is measured to the wall from within (`r - |p|`), so it goes
/// negative once a body passes outward through the wall. The normal faces the
/// center, which makes sticky gravity pull toward the wall.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoomSphere {
    pub radius: f64,
}

impl RoomSphere {
    pub fn new(radius: f64) -> Self {
        Self {
            radius: radius.max(0.0),
        }
    }
}

impl Shape4D for RoomSphere {
    fn kind(&self) -> ShapeKind {
        ShapeKind::RoomSphere
    }

    fn signed_distance(&self, local: Vector4) -> f64 {
        self.radius - local.length()
    }

    fn surface_normal(&self, local: Vector4) -> Vector4 {
        -radial_direction(local)
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
