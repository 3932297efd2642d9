use std::fmt;

use glam::Vec2;

/// Index type used for every mesh (32-bit, matching `wgpu::IndexFormat::Uint32`).
pub type Index = u32;

/// CPU-side triangle-list geometry.
///
/// Invariants (checked by [`Mesh::new`]):
/// - at least one vertex and one triangle
/// - index count is a multiple of 3
/// - every index addresses an existing vertex
/// - the index count fits a `u32` draw range
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec2>,
    indices: Vec<Index>,
    index_count: u32,
}

/// Why geometry was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    Empty,
    IncompleteTriangle { index_count: usize },
    IndexOutOfRange { position: usize, index: Index, vertex_count: usize },
    TooManyIndices { index_count: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Empty => write!(f, "mesh has no vertices or no indices"),
            MeshError::IncompleteTriangle { index_count } => {
                write!(f, "index count {index_count} is not a multiple of 3")
            }
            MeshError::IndexOutOfRange { position, index, vertex_count } => write!(
                f,
                "index {index} at position {position} is out of range for {vertex_count} vertices"
            ),
            MeshError::TooManyIndices { index_count } => {
                write!(f, "{index_count} indices exceed a single indexed draw")
            }
        }
    }
}

impl std::error::Error for MeshError {}

impl Mesh {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn new(vertices: Vec<Vec2>, indices: Vec<Index>) -> Result<Self, MeshError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(MeshError::Empty);
        }

        if indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle { index_count: indices.len() });
        }
        let index_count = draw_count(indices.len())?;

        let vertex_count = vertices.len();
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange { position, index, vertex_count });
        }

        Ok(Self {
            vertices,
            indices,
            index_count,
        })
    }

    /// Unit square spanning (-1, -1) to (1, 1), two triangles sharing the
    /// (1, 1)-(-1, -1) diagonal.
    ///
    /// ```text
    /// [0]------[1]
    ///  |        |
    ///  |        |
    /// [2]------[3]
    /// ```
    pub fn square() -> Self {
        Self {
            vertices: vec![
                Vec2::new(-1.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
            ],
            indices: vec![0, 1, 2, 3, 2, 1],
            index_count: 6,
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Iterates triangles as vertex-position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize],
                self.vertices[t[1] as usize],
                self.vertices[t[2] as usize],
            ]
        })
    }

    /// Size of the vertex upload in bytes.
    pub fn vertex_bytes(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }

    /// Size of the index upload in bytes.
    pub fn index_bytes(&self) -> u64 {
        std::mem::size_of_val(self.indices.as_slice()) as u64
    }

    /// Buffer layout: one `vec2` position per vertex at attribute slot 0.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vec2>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

fn draw_count(len: usize) -> Result<u32, MeshError> {
    u32::try_from(len).map_err(|_| MeshError::TooManyIndices { index_count: len })
}
