//! Host/shader interface of the shading core.
//!
//! Everything here must stay bit-exact with `res/shaders/*.wgsl`: bind group
//! slots, uniform struct sizes and vertex attribute locations and formats.
//! [`reflect`] checks the shader modules against these tables.

pub mod bindings;
pub mod reflect;
pub mod uniforms;
pub mod vertex;

use clap::ValueEnum;
use serde::Deserialize;

/// The two pipeline variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Texture sample only.
    Unlit,
    /// Ambient + Lambertian diffuse from one point light, times the texture.
    #[default]
    Lit,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Unlit => "unlit",
            Variant::Lit => "lit",
        }
    }
}

/// Entry point names, shared by both variants.
pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";
