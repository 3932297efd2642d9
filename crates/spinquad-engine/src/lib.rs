//! spinquad engine crate.
//!
//! Platform runtime, GPU device layer, and the small set of rendering
//! primitives needed to draw static meshes transformed in a vertex shader.

pub mod core;
pub mod device;
pub mod logging;
pub mod math;
pub mod render;
pub mod time;
pub mod window;
