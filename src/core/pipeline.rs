use nalgebra::{Vector2, Vector4};
use std::ops::{Add, Mul};

/// Values that can be linearly interpolated across a triangle.
///
/// `Add` + `Mul<f32>` are all barycentric interpolation needs. `Send + Sync`
/// because fragments are shaded from many threads at once.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

/// Texture coordinates alone are the unlit pipeline's varying.
impl Interpolatable for Vector2<f32> {}

/// The two programmable stages of one pipeline variant.
///
/// A `Shader` value is the set of resources bound for one draw call: the
/// texture and sampler, the camera uniform and (for the lit variant) the
/// light uniform. It is borrowed immutably by every invocation, so stages
/// are pure functions of their inputs plus these bindings.
pub trait Shader: Send + Sync {
    /// Per-vertex attributes read from vertex buffer 0.
    type Vertex: Send + Sync;

    /// Per-instance attributes read from vertex buffer 1 (`()` when the
    /// variant has no instance buffer).
    type Instance: Send + Sync;

    /// Vertex stage outputs interpolated for the fragment stage.
    type Varying: Interpolatable;

    /// Vertex stage: returns the clip-space position and the varyings.
    fn vertex(&self, vertex: &Self::Vertex, instance: &Self::Instance) -> (Vector4<f32>, Self::Varying);

    /// Fragment stage: returns the linear RGBA color of one fragment.
    /// Values are unclamped; the render target format decides what survives.
    fn fragment(&self, varying: Self::Varying) -> Vector4<f32>;
}
