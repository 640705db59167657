use crate::core::math::transform::normal_matrix;
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3};

/// Per-vertex input of the unlit pipeline (locations 0 and 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnlitVertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub tex_coord: Vector2<f32>,
}

impl UnlitVertex {
    pub fn new(position: Point3<f32>, tex_coord: Vector2<f32>) -> Self {
        Self {
            position,
            tex_coord,
        }
    }
}

/// Per-vertex input of the lit pipeline (locations 0, 1 and 2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitVertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Texture coordinates (UV).
    pub tex_coord: Vector2<f32>,
    /// Object-space normal. Expected to be unit length.
    pub normal: Vector3<f32>,
}

impl LitVertex {
    pub fn new(position: Point3<f32>, tex_coord: Vector2<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }

    /// Drops the normal so the same mesh can feed the unlit pipeline.
    pub fn to_unlit(&self) -> UnlitVertex {
        UnlitVertex::new(self.position, self.tex_coord)
    }
}

/// Per-instance transform of the lit pipeline.
///
/// `normal` must be the inverse-transpose of `model`'s upper-left 3x3,
/// computed by the host. The vertex stage never derives it; an identity normal
/// matrix under non-uniform scale gives wrong lighting without any error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    /// Object -> world.
    pub model: Matrix4<f32>,
    /// Object normal -> world normal.
    pub normal: Matrix3<f32>,
}

impl InstanceTransform {
    pub fn new(model: Matrix4<f32>, normal: Matrix3<f32>) -> Self {
        Self { model, normal }
    }

    /// Builds the instance with its normal matrix precomputed from `model`.
    pub fn from_model(model: Matrix4<f32>) -> Self {
        Self::new(model, normal_matrix(&model))
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity(), Matrix3::identity())
    }
}
