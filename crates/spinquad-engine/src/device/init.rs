/// How the window's GPU context is brought up.
///
/// The demo draws one untextured shape, so the defaults ask for nothing beyond
/// downlevel limits and no optional features.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick an adapter from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    /// Wait for vertical blank before presenting (`Fifo`); otherwise present
    /// as soon as possible (`AutoNoVsync`).
    pub vsync: bool,

    /// Requested composite alpha. Falls back to the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub limits: wgpu::Limits,

    /// Frames the surface may queue ahead of presentation. Only a hint.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::default(),
            prefer_srgb: true,
            vsync: true,
            alpha_mode: None,
            limits: wgpu::Limits::downlevel_defaults(),
            frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    pub(crate) fn instance_descriptor(&self) -> wgpu::InstanceDescriptor {
        wgpu::InstanceDescriptor {
            backends: self.backends,
            ..Default::default()
        }
    }

    pub(crate) fn device_descriptor(&self) -> wgpu::DeviceDescriptor<'static> {
        wgpu::DeviceDescriptor {
            label: Some("spinquad device"),
            required_features: wgpu::Features::empty(),
            required_limits: self.limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        }
    }
}
