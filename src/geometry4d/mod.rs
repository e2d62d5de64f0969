//! 4D solids: the shape contract, its variants, and the placed-object registry
//! the slicer and the integrators share.

use std::collections::BTreeMap;
use std::fmt;

mod ghost;
mod hypersphere;
mod klein_bottle;
pub mod parametric;
mod room_sphere;
mod slice_mesh;
mod torus;

pub use ghost::GhostProjection;
pub use hypersphere::{ball_section_radius, Hypersphere};
pub use klein_bottle::KleinBottle;
pub use room_sphere::RoomSphere;
pub use slice_mesh::{SliceMesh, SliceVertex};
pub use torus::Torus;

use crate::math4d::Vector4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Hypersphere,
    RoomSphere,
    KleinBottle,
    Torus,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hypersphere => "hypersphere",
            Self::RoomSphere => "room sphere",
            Self::KleinBottle => "klein bottle",
            Self::Torus => "torus",
        }
    }
}

/// What a 3D slice through a shape leaves behind.
#[derive(Clone, Debug, PartialEq)]
pub enum SliceSection {
    Hidden,
    /// Solid 3-ball centered on the object's xyz position.
    Ball { radius: f64 },
    Mesh(SliceMesh),
}

impl SliceSection {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Shape contract. All points are in the shape's local frame: the owning
/// [`Object4D`] subtracts its position before calling in.
///
/// `signed_distance` is negative when penetrating and `surface_normal` is the
/// unit direction a penetrating body is pushed along.
pub trait Shape4D: fmt::Debug {
    fn kind(&self) -> ShapeKind;

    fn signed_distance(&self, local: Vector4) -> f64;

    fn surface_normal(&self, local: Vector4) -> Vector4;

    /// Cross-section by the hyperplane `w = local_w`.
    fn slice(&self, local_w: f64) -> SliceSection;

    /// Half-extent of the shape along w, used for slicer bounds.
    fn w_extent(&self) -> f64;
}

/// A shape placed in the world, with its current slice state.
#[derive(Debug)]
pub struct Object4D {
    position: Vector4,
    shape: Box<dyn Shape4D>,
    section: SliceSection,
    last_slice_w: Option<f64>,
    ghost: GhostProjection,
}

impl Object4D {
    pub fn new(position: Vector4, shape: impl Shape4D + 'static) -> Self {
        Self::from_boxed(position, Box::new(shape))
    }

    pub fn from_boxed(position: Vector4, shape: Box<dyn Shape4D>) -> Self {
        Self {
            position,
            shape,
            section: SliceSection::Hidden,
            last_slice_w: None,
            ghost: GhostProjection::default(),
        }
    }

    pub fn position(&self) -> Vector4 {
        self.position
    }

    /// Move the object; the section is recut at the last seen slice.
    pub fn set_position(&mut self, position: Vector4) {
        self.position = position;
        if let Some(slice_w) = self.last_slice_w {
            self.update_slice(slice_w);
        }
    }

    pub fn shape(&self) -> &dyn Shape4D {
        self.shape.as_ref()
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn w_extent(&self) -> f64 {
        self.shape.w_extent()
    }

    pub fn get_signed_distance(&self, point: Vector4) -> f64 {
        self.shape.signed_distance(point - self.position)
    }

    pub fn get_surface_normal(&self, point: Vector4) -> Vector4 {
        self.shape.surface_normal(point - self.position)
    }

    /// Recompute the cross-section at `slice_w`. Returns true when
    /// visibility flipped.
    pub fn update_slice(&mut self, slice_w: f64) -> bool {
        let was_visible = self.section.is_visible();
        let offset = self.position.xyz();
        self.section = match self.shape.slice(slice_w - self.position.w) {
            SliceSection::Mesh(mesh) => SliceSection::Mesh(mesh.translated(offset)),
            other => other,
        };
        self.last_slice_w = Some(slice_w);
        was_visible != self.section.is_visible()
    }

    pub fn section(&self) -> &SliceSection {
        &self.section
    }

    pub fn is_visible(&self) -> bool {
        self.section.is_visible()
    }

    /// Radius of the visible 3-ball, for ball-sliced shapes.
    pub fn cross_section_radius(&self) -> Option<f64> {
        match self.section {
            SliceSection::Ball { radius } => Some(radius),
            _ => None,
        }
    }

    pub fn ghost(&self) -> &GhostProjection {
        &self.ghost
    }

    pub fn ghost_mut(&mut self) -> &mut GhostProjection {
        &mut self.ghost
    }

    pub fn update_ghost(&mut self, delta: f64) {
        let visible = self.section.is_visible();
        self.ghost.update(visible, delta);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(u64);

impl ShapeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Owner of every placed object, keyed by stable ids that are never reused.
#[derive(Debug, Default)]
pub struct ShapeSet {
    objects: BTreeMap<ShapeId, Object4D>,
    next_id: u64,
}

impl ShapeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: Object4D) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<Object4D> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Object4D> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Object4D> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Object4D)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ShapeId, &mut Object4D)> {
        self.objects.iter_mut().map(|(id, object)| (*id, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_queries_are_relative_to_position() {
        let object = Object4D::new(Vector4::new(10.0, 0.0, 0.0, 2.0), Hypersphere::new(1.0));
        let d = object.get_signed_distance(Vector4::new(10.0, 3.0, 0.0, 2.0));
        assert!((d - 2.0).abs() < 1e-12);
        let n = object.get_surface_normal(Vector4::new(10.0, 3.0, 0.0, 2.0));
        assert_eq!(n, Vector4::Y);
    }

    #[test]
    fn update_slice_reports_visibility_flips() {
        let mut object = Object4D::new(Vector4::new(0.0, 0.0, 0.0, 4.0), Hypersphere::new(5.0));
        assert!(!object.is_visible());
        assert!(object.update_slice(1.0));
        assert_eq!(object.cross_section_radius(), Some(4.0));
        assert!(!object.update_slice(2.0));
        assert!(object.update_slice(10.0));
        assert_eq!(object.section(), &SliceSection::Hidden);
        assert_eq!(object.cross_section_radius(), None);
    }

    #[test]
    fn moving_object_recuts_section() {
        let mut object = Object4D::new(Vector4::ZERO, Hypersphere::new(5.0));
        object.update_slice(0.0);
        assert_eq!(object.cross_section_radius(), Some(5.0));
        object.set_position(Vector4::new(0.0, 0.0, 0.0, 3.0));
        assert_eq!(object.cross_section_radius(), Some(4.0));
    }

    #[test]
    fn mesh_sections_are_placed_in_world() {
        let torus = Torus {
            mesh_resolution: 8,
            ..Torus::new(2.0, 0.5)
        };
        let mut object = Object4D::new(Vector4::new(10.0, 0.0, 0.0, 1.0), torus);
        object.update_slice(1.0);
        match object.section() {
            SliceSection::Mesh(mesh) => {
                let (lo, hi) = mesh.bounds().unwrap();
                assert!((lo[0] - 7.5).abs() < 1e-4);
                assert!((hi[0] - 12.5).abs() < 1e-4);
            }
            other => panic!("expected mesh, got {other:?}"),
        }
        assert_eq!(object.cross_section_radius(), None);
    }

    #[test]
    fn ghost_follows_visibility() {
        let mut object = Object4D::new(Vector4::ZERO, Hypersphere::new(1.0));
        object.update_slice(0.0);
        object.update_ghost(0.016);
        assert!(!object.ghost().is_shown());
        object.update_slice(3.0);
        object.update_ghost(0.016);
        assert!(object.ghost().is_shown());
    }

    #[test]
    fn shape_ids_are_not_reused() {
        let mut set = ShapeSet::new();
        let a = set.insert(Object4D::new(Vector4::ZERO, Hypersphere::new(1.0)));
        let b = set.insert(Object4D::new(Vector4::ZERO, RoomSphere::new(1.0)));
        assert_ne!(a, b);
        assert!(set.remove(a).is_some());
        let c = set.insert(Object4D::new(Vector4::ZERO, Hypersphere::new(1.0)));
        assert_ne!(a, c);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(a));
        assert_eq!(set.get(b).map(Object4D::kind), Some(ShapeKind::RoomSphere));
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![b, c]);
    }
}
