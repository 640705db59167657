use crate::core::geometry::{InstanceTransform, LitVertex};
use crate::core::pipeline::{Interpolatable, Shader};
use crate::layout::uniforms::{CameraUniform, LightUniform};
use crate::scene::texture::{Sampler, Texture};
use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Fraction of the light color applied regardless of orientation.
pub const AMBIENT_STRENGTH: f32 = 0.05;

/// Vertex stage outputs of the lit variant, locations 0..=2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitVarying {
    pub tex_coord: Vector2<f32>,
    /// Not renormalized, before or after interpolation.
    pub world_normal: Vector3<f32>,
    pub world_position: Vector3<f32>,
}

impl Add for LitVarying {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            tex_coord: self.tex_coord + other.tex_coord,
            world_normal: self.world_normal + other.world_normal,
            world_position: self.world_position + other.world_position,
        }
    }
}

impl Mul<f32> for LitVarying {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            tex_coord: self.tex_coord * scalar,
            world_normal: self.world_normal * scalar,
            world_position: self.world_position * scalar,
        }
    }
}

impl Interpolatable for LitVarying {}

/// Vertex stage of the lit variant.
///
/// The normal matrix is taken from the instance as supplied by the host.
#[inline]
pub fn vs_main(
    camera: &CameraUniform,
    vertex: &LitVertex,
    instance: &InstanceTransform,
) -> (Vector4<f32>, LitVarying) {
    let world_position = instance.model * vertex.position.to_homogeneous();
    let varying = LitVarying {
        tex_coord: vertex.tex_coord,
        world_normal: instance.normal * vertex.normal,
        world_position: world_position.xyz(),
    };
    (camera.view_proj() * world_position, varying)
}

/// Fragment stage of the lit variant.
///
/// `(ambient + diffuse) * texel.rgb`, alpha from the texel. Nothing is
/// clamped: a bright light or a colored ambient can push channels past 1.
#[inline]
pub fn fs_main(
    texture: &Texture,
    sampler: &Sampler,
    light: &LightUniform,
    varying: &LitVarying,
) -> Vector4<f32> {
    let object_color = sampler.sample(texture, varying.tex_coord);
    let light_color = light.color();

    let ambient_color = light_color * AMBIENT_STRENGTH;

    // Light exactly at the fragment: no direction, no diffuse.
    let to_light = light.position().coords - varying.world_position;
    let light_dir = to_light.try_normalize(0.0).unwrap_or_else(Vector3::zeros);

    let diffuse_strength = varying.world_normal.dot(&light_dir).max(0.0);
    let diffuse_color = light_color * diffuse_strength;

    let result = (ambient_color + diffuse_color).component_mul(&object_color.xyz());
    Vector4::new(result.x, result.y, result.z, object_color.w)
}

/// Resources bound for one lit draw: groups 0, 1 and 2.
pub struct LitShader<'a> {
    pub texture: &'a Texture,
    pub sampler: &'a Sampler,
    pub camera: &'a CameraUniform,
    pub light: &'a LightUniform,
}

impl<'a> LitShader<'a> {
    pub fn new(
        texture: &'a Texture,
        sampler: &'a Sampler,
        camera: &'a CameraUniform,
        light: &'a LightUniform,
    ) -> Self {
        Self {
            texture,
            sampler,
            camera,
            light,
        }
    }
}

impl Shader for LitShader<'_> {
    type Vertex = LitVertex;
    type Instance = InstanceTransform;
    type Varying = LitVarying;

    fn vertex(&self, vertex: &LitVertex, instance: &InstanceTransform) -> (Vector4<f32>, LitVarying) {
        vs_main(self.camera, vertex, instance)
    }

    fn fragment(&self, varying: LitVarying) -> Vector4<f32> {
        fs_main(self.texture, self.sampler, self.light, &varying)
    }
}
