/// A single acquired frame.
///
/// Holding the surface texture blocks acquisition of the next one, so a frame
/// must be submitted before the next redraw.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
