use glam::Mat3;
use wgpu::util::DeviceExt;

use crate::math::Mat3Std140;

use super::mesh::Mesh;
use super::program::{ShaderProgram, UniformLocation};
use super::RenderCtx;

/// A mesh uploaded to the GPU.
///
/// Both buffers are written exactly once at construction and never updated;
/// only the world matrix changes between draws. The buffers are owned
/// exclusively and destroyed when the `Shape` is dropped.
pub struct Shape {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Shape {
    pub fn new(ctx: &RenderCtx<'_>, mesh: &Mesh) -> Self {
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spinquad shape vbo"),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spinquad shape ibo"),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "uploaded shape: {} vertices ({} B), {} indices ({} B)",
            mesh.vertices().len(),
            vertex_buffer.size(),
            mesh.index_count(),
            index_buffer.size(),
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        }
    }

    pub fn vertex_buffer_size(&self) -> u64 {
        self.vertex_buffer.size()
    }

    pub fn index_buffer_size(&self) -> u64 {
        self.index_buffer.size()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Records one indexed draw of the whole mesh with `world_matrix`.
    ///
    /// `program` must already be bound on `pass`. The matrix is written
    /// column-major into the uniform at `location`.
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        program: &ShaderProgram,
        world_matrix: Mat3,
        location: UniformLocation,
    ) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        let packed = Mat3Std140::from(world_matrix);
        program.write_uniform(queue, location, bytemuck::bytes_of(&packed));

        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Drop for Shape {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        log::debug!("released shape buffers");
    }
}
