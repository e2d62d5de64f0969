//! Navigable four-dimensional geometry: 4D math, sliced shapes, and point
//! bodies that walk on their surfaces under sticky gravity.

pub mod geometry4d;
pub mod math4d;
pub mod physics4d;
pub mod rendering4d;
pub mod scene;
pub mod settings;

#[cfg(test)]
mod scenario_tests;

pub use geometry4d::{
    GhostProjection, Hypersphere, KleinBottle, Object4D, RoomSphere, Shape4D, ShapeId, ShapeKind,
    ShapeSet, SliceMesh, SliceSection, SliceVertex, Torus,
};
pub use math4d::{IsoclinicRotation, Matrix4, Transform4, Vector4};
pub use physics4d::{Physical4D, SurfaceWalker, WalkerEvent};
pub use rendering4d::Slicer;
pub use scene::{Scene, WalkerId};
pub use settings::SimulationSettings;
