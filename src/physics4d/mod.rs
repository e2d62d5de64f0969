//! Point-body integration with sticky, surface-relative gravity.

mod physical;
mod surface_walker;

pub use physical::{Physical4D, CONTACT_SKIN, MAX_UP_VELOCITY_GROUNDED, WORLD_DOWN};
pub use surface_walker::{SurfaceBasis, SurfaceWalker, WalkerEvent};
