//! Math types shared by renderers and applications.
//!
//! Vectors and matrices come from `glam`; matrices are column-major and act on
//! column vectors (`m * v`).

mod std140;
mod transform;

pub use glam::{Mat3, Vec2, Vec3};
pub use std140::Mat3Std140;
pub use transform::Transform2D;
