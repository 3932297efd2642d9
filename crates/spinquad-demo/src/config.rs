use std::path::PathBuf;

use spinquad_engine::math::Vec2;
use winit::dpi::PhysicalSize;

/// Startup parameters for the demo.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub window_size: PhysicalSize<u32>,
    pub clear_color: wgpu::Color,

    /// Uniform scale applied to the unit square.
    pub scale: f32,
    pub position: Vec2,
    /// Radians per second.
    pub angular_velocity: f32,

    /// Fragment shader, relative to the working directory.
    pub fragment_shader: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Vertex Shaders".to_string(),
            window_size: PhysicalSize::new(800, 600),
            clear_color: wgpu::Color::BLACK,
            scale: 0.25,
            position: Vec2::new(0.25, 0.25),
            angular_velocity: 1.0,
            fragment_shader: PathBuf::from("../shaders/fragment.glsl"),
        }
    }
}
