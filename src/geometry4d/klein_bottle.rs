use super::parametric::{self, ParametricSurface};
use super::{Shape4D, ShapeKind, SliceSection};
use crate::math4d::Vector4;

/// Klein bottle embedded in 4D without self-intersection.
///
/// A tube of radius `tube_radius` swept around a circle of `major_radius` in
/// the xy-plane, with the tube's cross-section turning half a revolution into
/// w over one sweep (the `u/2` twist).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KleinBottle {
    pub major_radius: f64,
    pub tube_radius: f64,
    /// Half-width of the w band used when cutting the mesh.
    pub slice_tolerance: f64,
    /// Mesh grid resolution per parameter.
    pub mesh_resolution: usize,
}

impl KleinBottle {
    pub fn new(major_radius: f64, tube_radius: f64) -> Self {
        Self {
            major_radius,
            tube_radius,
            slice_tolerance: tube_radius * 0.25,
            mesh_resolution: 48,
        }
    }
}

impl ParametricSurface for KleinBottle {
    fn point(&self, u: f64, v: f64) -> Vector4 {
        let ring = self.major_radius + self.tube_radius * v.cos();
        let half = 0.5 * u;
        Vector4::new(
            ring * u.cos(),
            ring * u.sin(),
            self.tube_radius * v.sin() * half.cos(),
            self.tube_radius * v.sin() * half.sin(),
        )
    }

    fn tube_radius(&self) -> f64 {
        self.tube_radius
    }
}

impl Shape4D for KleinBottle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::KleinBottle
    }

    fn signed_distance(&self, local: Vector4) -> f64 {
        parametric::sampled_signed_distance(self, local)
    }

    fn surface_normal(&self, local: Vector4) -> Vector4 {
        parametric::sampled_normal(self, local)
    }

    fn slice(&self, local_w: f64) -> SliceSection {
        let mesh =
            parametric::slice_mesh(self, local_w, self.slice_tolerance, self.mesh_resolution);
        if mesh.is_empty() {
            SliceSection::Hidden
        } else {
            SliceSection::Mesh(mesh)
        }
    }

    fn w_extent(&self) -> f64 {
        self.tube_radius
    }
}
