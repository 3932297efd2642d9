//! GPU rendering primitives.
//!
//! - [`Shader`]: one GLSL stage, compiled and validated on the CPU
//! - [`ProgramBuilder`] / [`ShaderProgram`]: a linked vertex + fragment pair
//!   with uniform locations resolved at link time
//! - [`Mesh`]: validated triangle-list geometry
//! - [`Shape`]: a mesh uploaded once into static GPU buffers
//!
//! Transformation happens in the vertex shader: geometry stays in local space
//! on the GPU and only a 3x3 world matrix is sent per draw.

mod ctx;
mod mesh;
mod program;
mod shader;
mod shape;

#[cfg(test)]
pub(crate) mod testing;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{Index, Mesh, MeshError};
pub use program::{LinkError, ProgramBuilder, ShaderProgram, UniformLocation, WORLD_MATRIX};
pub use shader::{Shader, ShaderError, ShaderStage};
pub use shape::Shape;
