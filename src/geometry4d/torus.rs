use super::parametric::{self, ParametricSurface};
use super::{Shape4D, ShapeKind, SliceSection};
use crate::math4d::Vector4;

/// Ring torus lying flat in the xz-plane of its own `w = 0` hyperplane.
///
/// It has no extent in w beyond the slice tolerance, so it only shows while
/// the slice passes through its center.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Torus {
    pub major_radius: f64,
    pub tube_radius: f64,
    pub slice_tolerance: f64,
    pub mesh_resolution: usize,
}

impl Torus {
    pub fn new(major_radius: f64, tube_radius: f64) -> Self {
        Self {
            major_radius,
            tube_radius,
            slice_tolerance: 0.5,
            mesh_resolution: 48,
        }
    }
}

impl ParametricSurface for Torus {
    fn point(&self, u: f64, v: f64) -> Vector4 {
        let ring = self.major_radius + self.tube_radius * v.cos();
        Vector4::new(
            ring * u.cos(),
            self.tube_radius * v.sin(),
            ring * u.sin(),
            0.0,
        )
    }

    fn tube_radius(&self) -> f64 {
        self.tube_radius
    }
}

impl Shape4D for Torus {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Torus
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
        self.slice_tolerance
    }
}
