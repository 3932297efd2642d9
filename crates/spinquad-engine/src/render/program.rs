//! Linked vertex + fragment shader pair.
//!
//! Linking turns two compiled [`Shader`]s into a render pipeline, creates one
//! uniform buffer per uniform binding the shaders read, and resolves every
//! uniform name to a [`UniformLocation`] once. Draw code then writes uniforms
//! through the cached locations instead of looking names up per frame.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use wgpu::naga;

use super::shader::{Compiled, Shader, ShaderError, ShaderStage};
use super::RenderCtx;

/// Name of the local-to-world matrix uniform shared by all spinquad shaders.
pub const WORLD_MATRIX: &str = "worldMatrix";

/// Where a named uniform lives: bind group, binding, and byte range inside the
/// binding's buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
    pub offset: u64,
    pub size: u64,
}

/// Why a program could not be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    MissingStage { stage: ShaderStage },
    NoEntryPoint { stage: ShaderStage },
    Shader(ShaderError),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingStage { stage } => write!(f, "no {stage} shader attached"),
            LinkError::NoEntryPoint { stage } => write!(f, "{stage} shader has no entry point"),
            LinkError::Shader(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkError::Shader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShaderError> for LinkError {
    fn from(e: ShaderError) -> Self {
        LinkError::Shader(e)
    }
}

/// Collects shaders for a program. One shader per stage.
#[derive(Debug, Default)]
pub struct ProgramBuilder<'s> {
    vertex: Option<&'s Shader>,
    fragment: Option<&'s Shader>,
}

impl<'s> ProgramBuilder<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a compiled shader to its stage slot.
    pub fn attach(&mut self, shader: &'s Shader) -> Result<&mut Self, ShaderError> {
        let stage = shader.stage();
        if !shader.is_compiled() {
            return Err(ShaderError::NotCompiled { stage });
        }

        let slot = match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };
        if slot.is_some() {
            return Err(ShaderError::StageAlreadyAttached { stage });
        }

        *slot = Some(shader);
        Ok(self)
    }

    fn stages(&self) -> Result<(Stage<'s>, Stage<'s>), LinkError> {
        let vertex = self
            .vertex
            .ok_or(LinkError::MissingStage { stage: ShaderStage::Vertex })?;
        let fragment = self
            .fragment
            .ok_or(LinkError::MissingStage { stage: ShaderStage::Fragment })?;
        Ok((Stage::of(vertex)?, Stage::of(fragment)?))
    }

    /// Builds the pipeline for drawing vertices described by `vertex_layout`
    /// into the surface format of `ctx`.
    pub fn link(
        &self,
        ctx: &RenderCtx<'_>,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<ShaderProgram, LinkError> {
        let (vs, fs) = self.stages()?;

        let vs_module = vs.create_module(ctx.device);
        let fs_module = fs.create_module(ctx.device);

        // Auto layout: bind group layouts are derived from the shaders.
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spinquad program"),
            layout: None,

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(vs.entry_point),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(fs.entry_point),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let reflected = UniformTable::reflect([vs.usage(), fs.usage()]);

        let buffers: Vec<UniformBuffer> = reflected
            .blocks
            .iter()
            .map(|block| UniformBuffer {
                group: block.group,
                binding: block.binding,
                buffer: ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("spinquad uniform block"),
                    size: block.padded_size(),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
            })
            .collect();

        let mut groups: Vec<u32> = buffers.iter().map(|b| b.group).collect();
        groups.sort_unstable();
        groups.dedup();

        let bind_groups = groups
            .into_iter()
            .map(|group| {
                let layout = pipeline.get_bind_group_layout(group);
                let entries: Vec<wgpu::BindGroupEntry<'_>> = buffers
                    .iter()
                    .filter(|b| b.group == group)
                    .map(|b| wgpu::BindGroupEntry {
                        binding: b.binding,
                        resource: b.buffer.as_entire_binding(),
                    })
                    .collect();

                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("spinquad uniform bind group"),
                    layout: &layout,
                    entries: &entries,
                });
                (group, bind_group)
            })
            .collect();

        let world_matrix = reflected.locations.get(WORLD_MATRIX).copied();
        if world_matrix.is_none() {
            log::warn!("linked program has no `{WORLD_MATRIX}` uniform");
        }

        log::info!(
            "linked program ({} uniform(s) across {} binding(s))",
            reflected.locations.len(),
            buffers.len()
        );

        Ok(ShaderProgram {
            pipeline,
            bind_groups,
            buffers,
            locations: reflected.locations,
            world_matrix,
        })
    }
}

/// A linked, ready-to-bind shader program.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_groups: Vec<(u32, wgpu::BindGroup)>,
    buffers: Vec<UniformBuffer>,
    locations: HashMap<String, UniformLocation>,
    world_matrix: Option<UniformLocation>,
}

impl ShaderProgram {
    /// Location of the `worldMatrix` uniform, resolved at link time.
    pub fn world_matrix_location(&self) -> Option<UniformLocation> {
        self.world_matrix
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name).copied()
    }

    /// Makes this program current on `pass` (pipeline + uniform bind groups).
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        for (group, bind_group) in &self.bind_groups {
            pass.set_bind_group(*group, bind_group, &[]);
        }
    }

    /// Writes raw bytes into the uniform at `location`.
    ///
    /// The write is staged on the queue and visible to every draw in the next
    /// submission.
    pub fn write_uniform(&self, queue: &wgpu::Queue, location: UniformLocation, bytes: &[u8]) {
        debug_assert!(bytes.len() as u64 <= location.size, "uniform write overflows its slot");

        let Some(target) = self
            .buffers
            .iter()
            .find(|b| b.group == location.group && b.binding == location.binding)
        else {
            log::warn!("no uniform buffer at group {} binding {}", location.group, location.binding);
            return;
        };

        queue.write_buffer(&target.buffer, location.offset, bytes);
    }
}

struct UniformBuffer {
    group: u32,
    binding: u32,
    buffer: wgpu::Buffer,
}

/// A compiled stage plus its entry point (always the module's first one).
struct Stage<'s> {
    stage: ShaderStage,
    compiled: &'s Compiled,
    entry_point: &'s str,
}

impl<'s> Stage<'s> {
    fn of(shader: &'s Shader) -> Result<Self, LinkError> {
        let stage = shader.stage();
        let compiled = shader.compiled()?;
        let entry_point = compiled
            .module
            .entry_points
            .first()
            .map(|ep| ep.name.as_str())
            .ok_or(LinkError::NoEntryPoint { stage })?;
        Ok(Self {
            stage,
            compiled,
            entry_point,
        })
    }

    /// The module and what its entry point uses, for reflection.
    fn usage(&self) -> (&'s naga::Module, &'s naga::valid::FunctionInfo) {
        (&self.compiled.module, self.compiled.info.get_entry_point(0))
    }

    fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let label = format!("spinquad {} module", self.stage);
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label.as_str()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(self.compiled.module.clone())),
        })
    }
}

/// A uniform binding declared by one or more stages.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UniformBlock {
    group: u32,
    binding: u32,
    size: u64,
}

impl UniformBlock {
    /// Uniform buffer sizes are kept at a multiple of 16 bytes.
    fn padded_size(&self) -> u64 {
        self.size.max(16).next_multiple_of(16)
    }
}

#[derive(Debug, Default)]
struct UniformTable {
    blocks: Vec<UniformBlock>,
    locations: HashMap<String, UniformLocation>,
}

impl UniformTable {
    /// Collects the uniform-space globals each entry point reads.
    ///
    /// Declared-but-unused uniforms are skipped: the pipeline's derived bind
    /// group layouts only contain bindings an entry point touches, and a bind
    /// group must match its layout exactly.
    ///
    /// A name resolves either to a whole uniform global or to a member of a
    /// uniform block. Bindings shared between stages are merged.
    fn reflect<'m>(
        stages: impl IntoIterator<Item = (&'m naga::Module, &'m naga::valid::FunctionInfo)>,
    ) -> Self {
        let mut table = Self::default();

        for (module, entry) in stages {
            for (handle, var) in module.global_variables.iter() {
                if var.space != naga::AddressSpace::Uniform || entry[handle].is_empty() {
                    continue;
                }
                let Some(rb) = var.binding.as_ref() else { continue };

                let inner = &module.types[var.ty].inner;
                let size = match inner {
                    naga::TypeInner::Struct { span, .. } => *span as u64,
                    other => other.size(module.to_ctx()) as u64,
                };

                match table
                    .blocks
                    .iter_mut()
                    .find(|b| b.group == rb.group && b.binding == rb.binding)
                {
                    Some(block) => block.size = block.size.max(size),
                    None => table.blocks.push(UniformBlock {
                        group: rb.group,
                        binding: rb.binding,
                        size,
                    }),
                }

                let at = |offset: u64, size: u64| UniformLocation {
                    group: rb.group,
                    binding: rb.binding,
                    offset,
                    size,
                };

                if let Some(name) = var.name.as_ref() {
                    table.locations.insert(name.clone(), at(0, size));
                }

                if let naga::TypeInner::Struct { members, .. } = inner {
                    for member in members {
                        let Some(name) = member.name.as_ref() else { continue };
                        let member_size = module.types[member.ty].inner.size(module.to_ctx()) as u64;
                        table
                            .locations
                            .insert(name.clone(), at(member.offset as u64, member_size));
                    }
                }
            }
        }

        table.blocks.sort_by_key(|b| (b.group, b.binding));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::tests::{FRAGMENT_SRC, VERTEX_SRC};
    use crate::render::testing::NoopGpu;
    use crate::render::Mesh;

    fn vs() -> Shader {
        Shader::from_source(VERTEX_SRC, ShaderStage::Vertex)
    }

    fn fs() -> Shader {
        Shader::from_source(FRAGMENT_SRC, ShaderStage::Fragment)
    }

    fn usage(shader: &Shader) -> (&naga::Module, &naga::valid::FunctionInfo) {
        let compiled = shader.compiled().unwrap();
        (&compiled.module, compiled.info.get_entry_point(0))
    }

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn attach_accepts_one_shader_per_stage() {
        let (v, f) = (vs(), fs());
        let mut b = ProgramBuilder::new();
        b.attach(&v).unwrap().attach(&f).unwrap();
        assert!(b.stages().is_ok());
    }

    #[test]
    fn attach_rejects_uncompiled_shader() {
        let broken = Shader::from_source("nope", ShaderStage::Vertex);
        let mut b = ProgramBuilder::new();
        assert_eq!(
            b.attach(&broken).unwrap_err(),
            ShaderError::NotCompiled { stage: ShaderStage::Vertex }
        );
    }

    #[test]
    fn attach_rejects_second_shader_for_same_stage() {
        let (a, c) = (vs(), vs());
        let mut b = ProgramBuilder::new();
        b.attach(&a).unwrap();
        assert_eq!(
            b.attach(&c).unwrap_err(),
            ShaderError::StageAlreadyAttached { stage: ShaderStage::Vertex }
        );
    }

    #[test]
    fn link_requires_both_stages() {
        let v = vs();
        let mut b = ProgramBuilder::new();
        b.attach(&v).unwrap();
        assert_eq!(
            b.stages().err(),
            Some(LinkError::MissingStage { stage: ShaderStage::Fragment })
        );
    }

    #[test]
    fn stages_use_glsl_main_entry_point() {
        let (v, f) = (vs(), fs());
        let mut b = ProgramBuilder::new();
        b.attach(&v).unwrap().attach(&f).unwrap();
        let (vs, fs) = b.stages().unwrap();
        assert_eq!(vs.entry_point, "main");
        assert_eq!(fs.entry_point, "main");
    }

    // ── reflection ────────────────────────────────────────────────────────

    #[test]
    fn world_matrix_resolves_to_first_binding() {
        let (v, f) = (vs(), fs());
        let table = UniformTable::reflect([usage(&v), usage(&f)]);

        let loc = table.locations[WORLD_MATRIX];
        assert_eq!((loc.group, loc.binding, loc.offset), (0, 0, 0));
        // mat3 in a uniform block: three vec4-aligned columns.
        assert_eq!(loc.size, 48);

        assert_eq!(table.blocks.len(), 1);
        assert_eq!(table.blocks[0].padded_size(), 48);
    }

    #[test]
    fn fragment_without_uniforms_reflects_nothing() {
        let f = fs();
        let table = UniformTable::reflect([usage(&f)]);
        assert!(table.blocks.is_empty());
        assert!(table.locations.is_empty());
    }

    #[test]
    fn member_offsets_follow_block_layout() {
        let src = "#version 450
layout(location = 0) in vec2 in_position;
layout(set = 0, binding = 1) uniform Params {
    float tint;
    mat3 worldMatrix;
};
void main() {
    gl_Position = vec4(worldMatrix * vec3(in_position * tint, 1.0), 1.0);
}
";
        let v = Shader::from_source(src, ShaderStage::Vertex);
        assert!(v.is_compiled(), "{}", v.info_log());
        let table = UniformTable::reflect([usage(&v)]);

        assert_eq!(table.locations["tint"].offset, 0);
        let wm = table.locations[WORLD_MATRIX];
        assert_eq!(wm.binding, 1);
        // float, then the matrix aligned to 16 bytes.
        assert_eq!(wm.offset, 16);
        assert_eq!(table.blocks[0].size, 64);
    }

    const UNUSED_UNIFORM_FRAGMENT: &str = "#version 450
layout(set = 0, binding = 1) uniform Tint {
    float tint;
};
layout(location = 0) out vec4 out_color;
void main() {
    out_color = vec4(1.0);
}
";

    #[test]
    fn declared_but_unused_uniforms_are_skipped() {
        let v = vs();
        let f = Shader::from_source(UNUSED_UNIFORM_FRAGMENT, ShaderStage::Fragment);
        assert!(f.is_compiled(), "{}", f.info_log());

        let table = UniformTable::reflect([usage(&v), usage(&f)]);
        assert_eq!(table.blocks.len(), 1);
        assert_eq!((table.blocks[0].group, table.blocks[0].binding), (0, 0));
        assert!(!table.locations.contains_key("tint"));
        assert!(table.locations.contains_key(WORLD_MATRIX));
    }

    #[test]
    fn links_with_declared_but_unused_uniform() {
        let gpu = NoopGpu::new();
        let v = vs();
        let f = Shader::from_source(UNUSED_UNIFORM_FRAGMENT, ShaderStage::Fragment);

        let mut b = ProgramBuilder::new();
        b.attach(&v).unwrap().attach(&f).unwrap();
        let program = b.link(&gpu.ctx(), Mesh::vertex_layout()).unwrap();

        assert_eq!(program.bind_groups.len(), 1);
        assert_eq!(program.buffers.len(), 1);
        assert_eq!(program.uniform_location("tint"), None);
    }

    #[test]
    fn padded_size_rounds_up_to_sixteen() {
        let b = |size| UniformBlock { group: 0, binding: 0, size };
        assert_eq!(b(4).padded_size(), 16);
        assert_eq!(b(48).padded_size(), 48);
        assert_eq!(b(52).padded_size(), 64);
    }
}
