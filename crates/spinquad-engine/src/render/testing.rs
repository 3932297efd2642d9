//! Headless GPU fixtures backed by wgpu's noop backend.

use winit::dpi::PhysicalSize;

use super::RenderCtx;

pub(crate) const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub(crate) const TARGET_SIZE: PhysicalSize<u32> = PhysicalSize::new(64, 64);

pub(crate) struct NoopGpu {
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
}

impl NoopGpu {
    pub(crate) fn new() -> Self {
        let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
        Self { device, queue }
    }

    pub(crate) fn ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, TARGET_FORMAT, TARGET_SIZE)
    }

    /// An offscreen color target matching [`Self::ctx`].
    pub(crate) fn target_view(&self) -> wgpu::TextureView {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("noop target"),
            size: wgpu::Extent3d {
                width: TARGET_SIZE.width,
                height: TARGET_SIZE.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}
