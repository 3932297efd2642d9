use bytemuck::{Pod, Zeroable};
use glam::Mat3;

/// `mat3` laid out for a uniform buffer.
///
/// Uniform blocks align every matrix column like a `vec4`, so each of the three
/// columns carries one float of padding (48 bytes total). Columns are written in
/// order without transposition.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat3Std140 {
    pub cols: [[f32; 4]; 3],
}

impl From<Mat3> for Mat3Std140 {
    fn from(m: Mat3) -> Self {
        let [x, y, z] = m.to_cols_array_2d();
        Self {
            cols: [
                [x[0], x[1], x[2], 0.0],
                [y[0], y[1], y[2], 0.0],
                [z[0], z[1], z[2], 0.0],
            ],
        }
    }
}
