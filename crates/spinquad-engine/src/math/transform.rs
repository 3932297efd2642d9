use glam::{Mat3, Vec2};

/// 2D transform: position, rotation (radians), and per-axis scale.
///
/// The matrix is always composed as `translate * rotate * scale` (column
/// vectors), i.e. a local point is scaled first, then rotated about the local
/// origin, then moved to `position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    position: Vec2,
    rotation: f32,
    scale: Vec2,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::ONE,
    };

    #[inline]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Moves the transform by `delta`, relative to the current position.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Sets a uniform scale on both axes.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Vec2::splat(scale);
    }

    pub fn set_scale_xy(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    /// Adds `delta` radians to the accumulated rotation.
    ///
    /// The angle is never wrapped; `sin`/`cos` take care of periodicity.
    pub fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
    }

    /// Local-to-world affine matrix (column-major).
    pub fn matrix(&self) -> Mat3 {
        Mat3::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Maps a local point to world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.matrix().transform_point2(local)
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
