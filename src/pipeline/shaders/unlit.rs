use crate::core::geometry::UnlitVertex;
use crate::core::pipeline::Shader;
use crate::layout::uniforms::CameraUniform;
use crate::scene::texture::{Sampler, Texture};
use nalgebra::{Vector2, Vector4};

/// Vertex stage of the unlit variant.
///
/// The camera's view-projection is applied to the position as given; there is
/// no model matrix. The texture coordinate passes through untouched.
#[inline]
pub fn vs_main(camera: &CameraUniform, vertex: &UnlitVertex) -> (Vector4<f32>, Vector2<f32>) {
    let clip_position = camera.view_proj() * vertex.position.to_homogeneous();
    (clip_position, vertex.tex_coord)
}

/// Fragment stage of the unlit variant: the sampled texel, alpha included.
#[inline]
pub fn fs_main(texture: &Texture, sampler: &Sampler, tex_coord: Vector2<f32>) -> Vector4<f32> {
    sampler.sample(texture, tex_coord)
}

/// Resources bound for one unlit draw: group 0 and group 1.
pub struct UnlitShader<'a> {
    pub texture: &'a Texture,
    pub sampler: &'a Sampler,
    pub camera: &'a CameraUniform,
}

impl<'a> UnlitShader<'a> {
    pub fn new(texture: &'a Texture, sampler: &'a Sampler, camera: &'a CameraUniform) -> Self {
        Self {
            texture,
            sampler,
            camera,
        }
    }
}

impl Shader for UnlitShader<'_> {
    type Vertex = UnlitVertex;
    /// No instance buffer.
    type Instance = ();
    type Varying = Vector2<f32>;

    fn vertex(&self, vertex: &UnlitVertex, _instance: &()) -> (Vector4<f32>, Self::Varying) {
        vs_main(self.camera, vertex)
    }

    fn fragment(&self, varying: Self::Varying) -> Vector4<f32> {
        fs_main(self.texture, self.sampler, varying)
    }
}
