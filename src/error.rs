use thiserror::Error;

/// Errors surfaced by the host-side setup of the shading core.
///
/// None of these can happen inside a stage invocation. They are all raised
/// while loading assets or creating a pipeline, before the first draw.
#[derive(Error, Debug)]
pub enum ShadingError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to load texture '{path}': {source}")]
    Texture {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageOutput {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load OBJ '{path}': {reason}")]
    Obj { path: String, reason: String },

    #[error("WGSL parse error in {module}: {message}")]
    ShaderParse { module: &'static str, message: String },

    #[error("WGSL validation error in {module}: {message}")]
    ShaderValidation { module: &'static str, message: String },

    /// A bind group slot declared by the layout does not match the shader.
    #[error("Binding mismatch at @group({group}) @binding({binding}): {reason}")]
    BindingMismatch {
        group: u32,
        binding: u32,
        reason: String,
    },

    /// A vertex attribute declared by the layout does not match the shader or host.
    #[error("Vertex attribute mismatch at @location({location}): {reason}")]
    AttributeMismatch { location: u32, reason: String },

    #[error("Buffer layout error: {0}")]
    BufferLayout(String),
}

pub type Result<T> = std::result::Result<T, ShadingError>;
