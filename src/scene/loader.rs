use crate::core::geometry::LitVertex;
use crate::error::Result;
use crate::io::config::{BuiltinMesh, CameraConfig, Config, MeshConfig, ProjectionKind, TextureConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::instance::ModelTransform;
use crate::scene::light::PointLight;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use nalgebra::{Point3, Vector3, Vector4};

pub fn build_camera(config: &CameraConfig, aspect_ratio: f32) -> Camera {
    let position = Point3::from(config.position);
    let target = Point3::from(config.target);
    let up = Vector3::from(config.up);

    match config.projection {
        ProjectionKind::Perspective => Camera::new_perspective(
            position,
            target,
            up,
            config.fov.to_radians(),
            aspect_ratio,
            config.near,
            config.far,
        ),
        ProjectionKind::Orthographic => Camera::new_orthographic(
            position,
            target,
            up,
            config.ortho_height,
            aspect_ratio,
            config.near,
            config.far,
        ),
    }
}

pub fn builtin_mesh(kind: BuiltinMesh) -> Mesh<LitVertex> {
    match kind {
        BuiltinMesh::Cube => Mesh::create_cube(),
        BuiltinMesh::Quad => Mesh::create_quad(0.5),
        BuiltinMesh::Triangle => Mesh::create_test_triangle(),
    }
}

/// Loads the configured OBJ, falling back to the builtin mesh on failure.
pub fn load_mesh(config: &MeshConfig) -> Mesh<LitVertex> {
    let Some(path) = &config.path else {
        return builtin_mesh(config.builtin);
    };
    match load_obj(path) {
        Ok(mut mesh) => {
            if config.normalize {
                let (center, scale) = mesh.normalize_and_center();
                info!("Mesh normalized. Center: {:?}, Scale: {:.4}", center, scale);
            }
            mesh
        }
        Err(e) => {
            error!("{}. Using builtin {:?} mesh.", e, config.builtin);
            builtin_mesh(config.builtin)
        }
    }
}

/// Loads the configured texture, falling back to a checkerboard.
pub fn load_texture(config: &TextureConfig) -> Texture {
    let fallback = || {
        Texture::checkerboard(
            256,
            8,
            Vector4::new(0.9, 0.9, 0.9, 1.0),
            Vector4::new(0.2, 0.2, 0.2, 1.0),
        )
    };
    match &config.path {
        Some(path) => Texture::load(path, config.srgb).unwrap_or_else(|e| {
            warn!("{}. Using checkerboard texture.", e);
            fallback()
        }),
        None => fallback(),
    }
}

/// Initial resource loading (heavy I/O). Returns a RenderContext.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext> {
    let aspect_ratio = config.render.width as f32 / config.render.height.max(1) as f32;
    let camera = build_camera(&config.camera, aspect_ratio);

    let light = PointLight::new(
        Point3::from(config.light.position),
        Vector3::from(config.light.color),
    )
    .with_intensity(config.light.intensity);

    let mesh = load_mesh(&config.mesh);
    let texture = load_texture(&config.texture);

    let instances: Vec<ModelTransform> = config
        .instances
        .iter()
        .map(|inst| {
            ModelTransform::from_trs(
                Vector3::from(inst.position),
                Vector3::from(inst.rotation),
                Vector3::from(inst.scale),
            )
        })
        .collect();
    if instances.is_empty() {
        warn!("No instances configured; the lit pipeline will draw nothing.");
    }

    info!(
        "Scene ready: {} vertices, {} triangles, {} instances, texture {}x{}",
        mesh.vertices.len(),
        mesh.triangle_count(),
        instances.len(),
        texture.width,
        texture.height
    );

    Ok(RenderContext {
        camera,
        light,
        mesh,
        texture,
        sampler: config.texture.sampler,
        instances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_lit_cube_scene() {
        let context = init_scene_resources(&Config::default()).unwrap();
        assert_eq!(context.mesh.vertices.len(), 24);
        assert_eq!(context.instances.len(), 1);
        assert_eq!(context.texture.width, 256);
        assert_eq!(context.light.uniform().color(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn unreadable_assets_fall_back() {
        let mesh = load_mesh(&MeshConfig {
            path: Some("missing.obj".to_string()),
            builtin: BuiltinMesh::Triangle,
            normalize: true,
        });
        assert_eq!(mesh.triangle_count(), 1);

        let texture = load_texture(&TextureConfig {
            path: Some("missing.png".to_string()),
            ..Default::default()
        });
        assert_eq!(texture.width, 256);
    }
}
