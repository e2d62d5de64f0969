//! Brute-force queries against closed 2-surfaces given by a parametrization
//! over `(u, v) ∈ [0, 2π)²`.
//!
//! Distance and normal come from a coarse grid search. This is O(n²) per call
//! and only meant for decorative surfaces, not primary walking floors.

use std::f64::consts::TAU;

use super::slice_mesh::SliceMesh;
use crate::math4d::Vector4;

/// Grid resolution (per axis) for distance and normal sampling.
pub const SAMPLE_GRID: usize = 16;
/// Fraction of the tube radius subtracted from the sampled distance.
pub const TUBE_OFFSET_FACTOR: f64 = 0.1;
const TANGENT_STEP: f64 = 1e-4;

pub trait ParametricSurface {
    /// Surface point in the shape's local frame.
    fn point(&self, u: f64, v: f64) -> Vector4;

    fn tube_radius(&self) -> f64;
}

#[derive(Copy, Clone, Debug)]
pub struct Sample {
    pub u: f64,
    pub v: f64,
    pub point: Vector4,
    pub distance: f64,
}

fn grid_param(i: usize, resolution: usize) -> f64 {
    TAU * i as f64 / resolution as f64
}

pub fn nearest_sample<S: ParametricSurface + ?Sized>(surface: &S, local: Vector4) -> Sample {
    let mut best = Sample {
        u: 0.0,
        v: 0.0,
        point: surface.point(0.0, 0.0),
        distance: f64::INFINITY,
    };
    for i in 0..SAMPLE_GRID {
        let u = grid_param(i, SAMPLE_GRID);
        for j in 0..SAMPLE_GRID {
            let v = grid_param(j, SAMPLE_GRID);
            let point = surface.point(u, v);
            let distance = point.distance(local);
            if distance < best.distance {
                best = Sample {
                    u,
                    v,
                    point,
                    distance,
                };
            }
        }
    }
    best
}

/// Nearest sampled distance minus a small fraction of the tube radius.
pub fn sampled_signed_distance<S: ParametricSurface + ?Sized>(surface: &S, local: Vector4) -> f64 {
    nearest_sample(surface, local).distance - surface.tube_radius() * TUBE_OFFSET_FACTOR
}

/// Central-difference tangents at `(u, v)`.
pub fn tangents<S: ParametricSurface + ?Sized>(surface: &S, u: f64, v: f64) -> (Vector4, Vector4) {
    let h = TANGENT_STEP;
    let du = (surface.point(u + h, v) - surface.point(u - h, v)) / (2.0 * h);
    let dv = (surface.point(u, v + h) - surface.point(u, v - h)) / (2.0 * h);
    (du, dv)
}

/// Normal at the nearest sample, oriented toward `local`.
///
/// A 2-surface in 4D has a two-dimensional normal space; `make_normal` with
/// +W as the third vector picks one direction in it. Where that collapses the
/// offset from the sample point is used instead.
pub fn sampled_normal<S: ParametricSurface + ?Sized>(surface: &S, local: Vector4) -> Vector4 {
    let sample = nearest_sample(surface, local);
    let (du, dv) = tangents(surface, sample.u, sample.v);
    let offset = local - sample.point;

    let mut normal = Vector4::make_normal(du, dv, Vector4::W).normalize();
    if normal.is_near_zero() {
        normal = offset.normalize();
    }
    if normal.is_near_zero() {
        return Vector4::Y;
    }
    if normal.dot(offset) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Cross-section mesh at `local_w`: every grid quad whose four corners lie
/// within `tolerance` of the slice, projected to 3D by dropping w.
pub fn slice_mesh<S: ParametricSurface + ?Sized>(
    surface: &S,
    local_w: f64,
    tolerance: f64,
    resolution: usize,
) -> SliceMesh {
    let resolution = resolution.max(3);
    let mut mesh = SliceMesh::default();

    // One extra row and column so the seam quads close the surface.
    let grid: Vec<Vec<Vector4>> = (0..=resolution)
        .map(|i| {
            let u = grid_param(i, resolution);
            (0..=resolution)
                .map(|j| surface.point(u, grid_param(j, resolution)))
                .collect()
        })
        .collect();

    for i in 0..resolution {
        for j in 0..resolution {
            let corners = [grid[i][j], grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]];
            if corners.iter().all(|c| (c.w - local_w).abs() <= tolerance) {
                mesh.push_quad(corners.map(Vector4::xyz));
            }
        }
    }
    mesh
}
