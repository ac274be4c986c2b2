//! f64 affine transforms, bounding boxes, and angle conversions for the Rift Engine.

mod aabb;
mod angles;
mod transform;

pub use aabb::Aabb;
pub use angles::{direction_to_yaw, yaw_to_direction};
pub use transform::Transform;
