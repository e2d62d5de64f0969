//! 4D linear algebra: vectors, linear maps, isoclinic rotations and affine
//! transforms.

mod isoclinic;
mod matrix4;
mod transform4;
mod vector4;

pub use isoclinic::{left_matrix, right_matrix, IsoclinicRotation};
pub use matrix4::Matrix4;
pub use transform4::Transform4;
pub use vector4::{Vector4, EPSILON};
