use crate::core::rasterizer::CullMode;
use crate::error::{Result, ShadingError};
use crate::layout::Variant;
use crate::scene::texture::Sampler;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scene description read from `scene.toml`. Every section and field is
/// optional; missing ones fall back to a lit, textured cube.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub texture: TextureConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
    #[serde(default = "default_instances")]
    pub instances: Vec<InstanceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            texture: TextureConfig::default(),
            mesh: MeshConfig::default(),
            instances: default_instances(),
        }
    }
}

fn default_instances() -> Vec<InstanceConfig> {
    vec![InstanceConfig::default()]
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    /// Supersampling factor per axis.
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default = "default_cull_mode")]
    pub cull_mode: CullMode,
    /// Linear RGBA.
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            samples: default_samples(),
            variant: Variant::default(),
            cull_mode: default_cull_mode(),
            clear_color: default_clear_color(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_samples() -> usize {
    2
}
fn default_cull_mode() -> CullMode {
    CullMode::Back
}
fn default_clear_color() -> [f32; 4] {
    [0.1, 0.2, 0.3, 1.0]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default)]
    pub projection: ProjectionKind,
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            projection: ProjectionKind::default(),
            ortho_height: default_ortho_height(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.0, 2.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_ortho_height() -> f32 {
    3.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_position")]
    pub position: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: default_light_position(),
            color: default_light_color(),
            intensity: default_intensity(),
        }
    }
}

fn default_light_position() -> [f32; 3] {
    [2.0, 2.0, 2.0]
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct TextureConfig {
    /// Image file; a checkerboard is generated when absent or unreadable.
    pub path: Option<String>,
    /// Decode color channels from sRGB. Turn off for data textures.
    #[serde(default = "default_true")]
    pub srgb: bool,
    #[serde(flatten)]
    pub sampler: Sampler,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            path: None,
            srgb: true,
            sampler: Sampler::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinMesh {
    #[default]
    Cube,
    Quad,
    Triangle,
}

#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    /// OBJ file; overrides `builtin`.
    pub path: Option<String>,
    #[serde(default)]
    pub builtin: BuiltinMesh,
    /// Center and fit a loaded OBJ into [-0.9, 0.9].
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            path: None,
            builtin: BuiltinMesh::default(),
            normalize: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InstanceConfig {
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees, applied X then Y then Z.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: default_scale(),
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref).map_err(|source| ShadingError::Io {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::{AddressMode, FilterMode};

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.render.variant, Variant::Lit);
        assert_eq!(config.render.cull_mode, CullMode::Back);
        assert_eq!(config.instances.len(), 1);
        assert_eq!(config.mesh.builtin, BuiltinMesh::Cube);
        assert!(config.texture.srgb);
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [render]
            width = 64
            height = 32
            variant = "unlit"
            cull_mode = "none"

            [camera]
            projection = "orthographic"

            [texture]
            srgb = false
            address_mode_u = "clamp_to_edge"
            filter = "nearest"

            [mesh]
            builtin = "quad"

            [[instances]]
            position = [1.0, 0.0, 0.0]

            [[instances]]
            scale = [2.0, 2.0, 2.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.variant, Variant::Unlit);
        assert_eq!(config.render.cull_mode, CullMode::None);
        assert_eq!(config.camera.projection, ProjectionKind::Orthographic);
        assert!(!config.texture.srgb);
        assert_eq!(config.texture.sampler.address_mode_u, AddressMode::ClampToEdge);
        assert_eq!(config.texture.sampler.address_mode_v, AddressMode::Repeat);
        assert_eq!(config.texture.sampler.filter, FilterMode::Nearest);
        assert_eq!(config.mesh.builtin, BuiltinMesh::Quad);
        assert_eq!(config.instances.len(), 2);
        assert_eq!(config.instances[1].scale, [2.0, 2.0, 2.0]);
        assert_eq!(config.instances[0].scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn unknown_variant_is_a_config_error() {
        let err = Config::from_toml("[render]\nvariant = \"pbr\"\n").unwrap_err();
        assert!(matches!(err, ShadingError::Config(_)));
    }
}
