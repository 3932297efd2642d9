use anyhow::{Context, Result};
use spinquad_engine::math::{Mat3, Transform2D};
use spinquad_engine::render::{
    Mesh, ProgramBuilder, RenderCtx, RenderTarget, Shader, ShaderProgram, ShaderStage, Shape,
    UniformLocation,
};

use crate::assets;
use crate::config::DemoConfig;

/// Per-vertex transform done on the GPU: the position (attribute 0) is
/// extended to homogeneous coordinates and multiplied by `worldMatrix`.
const VERTEX_SHADER: &str = "#version 450
layout(location = 0) in vec2 in_position;

layout(set = 0, binding = 0) uniform WorldBlock {
    mat3 worldMatrix;
};

void main()
{
    vec3 transformed = worldMatrix * vec3(in_position, 1.0);
    gl_Position = vec4(transformed, 1.0);
}
";

/// A linked program and the cached location of its world matrix.
struct Linked {
    program: ShaderProgram,
    world_matrix: UniformLocation,
}

/// Everything drawn each frame: one square, its transform, one program.
///
/// Field order is drop order: the program goes before the shape's buffers.
pub struct Scene {
    linked: Option<Linked>,
    shape: Shape,
    transform: Transform2D,
    angular_velocity: f32,
}

impl Scene {
    pub fn build(ctx: &RenderCtx<'_>, config: &DemoConfig) -> Self {
        let shape = Shape::new(ctx, &Mesh::square());

        let mut transform = Transform2D::new();
        transform.set_scale(config.scale);
        transform.set_position(config.position);

        let vertex = Shader::from_source(VERTEX_SHADER, ShaderStage::Vertex);
        let fragment = Shader::from_file(
            assets::resolve(&config.fragment_shader),
            ShaderStage::Fragment,
        );

        // A broken shader leaves the window up with nothing drawn.
        let linked = match link(ctx, &vertex, &fragment) {
            Ok(linked) => Some(linked),
            Err(err) => {
                log::error!("shader program unavailable: {err:#}");
                None
            }
        };

        Self {
            linked,
            shape,
            transform,
            angular_velocity: config.angular_velocity,
        }
    }

    /// Tears the scene down, program first, then the shape and its buffers.
    /// Returns the total rotation reached.
    pub fn release(self) -> f32 {
        let rotation = self.rotation();
        let Self { linked, shape, .. } = self;

        if linked.is_some() {
            log::debug!("releasing shader program");
        }
        drop(linked);
        drop(shape);

        rotation
    }

    pub fn has_program(&self) -> bool {
        self.linked.is_some()
    }

    /// Advances the rotation by the frame's elapsed time.
    pub fn advance(&mut self, dt: f32) {
        self.transform.rotate(dt * self.angular_velocity);
    }

    pub fn rotation(&self) -> f32 {
        self.transform.rotation()
    }

    pub fn world_matrix(&self) -> Mat3 {
        self.transform.matrix()
    }

    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let Some(linked) = self.linked.as_ref() else { return };

        let mut pass = target.begin_pass("spinquad scene");
        linked.program.bind(&mut pass);
        self.shape.draw(
            ctx.queue,
            &mut pass,
            &linked.program,
            self.world_matrix(),
            linked.world_matrix,
        );
    }
}

fn link(ctx: &RenderCtx<'_>, vertex: &Shader, fragment: &Shader) -> Result<Linked> {
    let mut builder = ProgramBuilder::new();
    builder.attach(vertex)?.attach(fragment)?;

    let program = builder.link(ctx, Mesh::vertex_layout())?;
    let world_matrix = program
        .world_matrix_location()
        .context("vertex shader does not declare `worldMatrix`")?;

    Ok(Linked {
        program,
        world_matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinquad_engine::math::Vec2;
    use winit::dpi::PhysicalSize;

    fn noop_ctx_parts() -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
    }

    fn ctx<'a>(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> RenderCtx<'a> {
        RenderCtx::new(
            device,
            queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            PhysicalSize::new(800, 600),
        )
    }

    #[test]
    fn missing_fragment_shader_leaves_scene_without_program() {
        let (device, queue) = noop_ctx_parts();
        let config = DemoConfig {
            fragment_shader: "does/not/exist.glsl".into(),
            ..DemoConfig::default()
        };

        let scene = Scene::build(&ctx(&device, &queue), &config);
        assert!(!scene.has_program());
        assert_eq!(scene.release(), 0.0);
    }

    #[test]
    fn rotation_accumulates_and_is_reported_on_release() {
        let (device, queue) = noop_ctx_parts();
        let config = DemoConfig {
            fragment_shader: "does/not/exist.glsl".into(),
            angular_velocity: 2.0,
            ..DemoConfig::default()
        };

        let mut scene = Scene::build(&ctx(&device, &queue), &config);
        scene.advance(0.25);
        scene.advance(0.25);
        assert!((scene.rotation() - 1.0).abs() < 1e-6);

        // Position survives rotation: the origin lands on the configured offset.
        let origin = scene.world_matrix().transform_point2(Vec2::ZERO);
        assert!((origin - config.position).length() < 1e-6);

        assert!((scene.release() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bundled_shaders_link_and_draw() {
        let (device, queue) = noop_ctx_parts();
        let ctx = ctx(&device, &queue);

        let mut scene = Scene::build(&ctx, &DemoConfig::default());
        assert!(scene.has_program());
        scene.advance(0.016);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene target"),
            size: wgpu::Extent3d {
                width: ctx.size.width,
                height: ctx.size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&Default::default());
        scene.draw(&ctx, &mut RenderTarget::new(&mut encoder, &view));
        queue.submit([encoder.finish()]);

        scene.release();
    }
}
