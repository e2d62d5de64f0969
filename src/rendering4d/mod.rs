//! The 3D slice through 4D space that the render layer draws.

mod slicer;

pub use slicer::Slicer;
