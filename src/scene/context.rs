use crate::core::geometry::LitVertex;
use crate::scene::camera::Camera;
use crate::scene::instance::ModelTransform;
use crate::scene::light::PointLight;
use crate::scene::mesh::Mesh;
use crate::scene::texture::{Sampler, Texture};

/// Holds all scene resources required for rendering.
///
/// The mesh is kept in its lit form; the unlit pipeline drops the normals.
pub struct RenderContext {
    pub camera: Camera,
    pub light: PointLight,
    pub mesh: Mesh<LitVertex>,
    pub texture: Texture,
    pub sampler: Sampler,
    pub instances: Vec<ModelTransform>,
}
