use crate::core::color::srgb_to_linear;
use crate::error::{Result, ShadingError};
use image::DynamicImage;
use log::info;
use nalgebra::{Vector2, Vector4};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// A 2D texture holding linear RGBA texels, row 0 at the top.
///
/// Equivalent to the `texture_2d<f32>` at `@group(0) @binding(0)` after
/// upload: color textures are decoded from sRGB once, the way an
/// `Rgba8UnormSrgb` texture returns linear values when sampled.
#[derive(Debug, Clone)]
pub struct Texture {
    texels: Arc<Vec<Vector4<f32>>>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Wraps already-linear texels. Returns `None` if the count does not match.
    pub fn from_texels(width: u32, height: u32, texels: Vec<Vector4<f32>>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            texels: Arc::new(texels),
            width,
            height,
        })
    }

    /// A single-texel texture.
    pub fn solid(color: Vector4<f32>) -> Self {
        Self {
            texels: Arc::new(vec![color]),
            width: 1,
            height: 1,
        }
    }

    /// `cells` x `cells` checkerboard, used when no texture file is configured.
    pub fn checkerboard(size: u32, cells: u32, a: Vector4<f32>, b: Vector4<f32>) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let texels = (0..size)
            .flat_map(|y| (0..size).map(move |x| (x, y)))
            .map(|(x, y)| if (x / cell + y / cell) % 2 == 0 { a } else { b })
            .collect();
        Self {
            texels: Arc::new(texels),
            width: size,
            height: size,
        }
    }

    /// Loads an image file. `srgb` selects sRGB decoding for color data.
    pub fn load<P: AsRef<Path>>(path: P, srgb: bool) -> Result<Self> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref).map_err(|source| ShadingError::Texture {
            path: path_ref.display().to_string(),
            source,
        })?;
        let texture = Self::from_image(&img, srgb);
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_image(img: &DynamicImage, srgb: bool) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let decode = |c: u8| {
            let v = c as f32 / 255.0;
            if srgb { srgb_to_linear(v) } else { v }
        };
        let texels = rgba
            .pixels()
            .map(|p| Vector4::new(decode(p[0]), decode(p[1]), decode(p[2]), p[3] as f32 / 255.0))
            .collect();
        Self {
            texels: Arc::new(texels),
            width,
            height,
        }
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Vector4<f32> {
        self.texels[(y * self.width + x) as usize]
    }
}

//=================================
// Sampler
//=================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    #[default]
    Repeat,
    ClampToEdge,
    MirrorRepeat,
}

impl AddressMode {
    /// Maps an integer texel coordinate into [0, size).
    #[inline]
    fn apply(self, i: i64, size: u32) -> u32 {
        let n = size as i64;
        let wrapped = match self {
            AddressMode::Repeat => i.rem_euclid(n),
            AddressMode::ClampToEdge => i.clamp(0, n - 1),
            AddressMode::MirrorRepeat => {
                let m = i.rem_euclid(2 * n);
                if m < n { m } else { 2 * n - 1 - m }
            }
        };
        wrapped as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

/// Sampling configuration bound at `@group(0) @binding(1)`.
///
/// Without screen-space derivatives there is no minification/magnification
/// distinction, so one filter serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Sampler {
    #[serde(default)]
    pub address_mode_u: AddressMode,
    #[serde(default)]
    pub address_mode_v: AddressMode,
    #[serde(default)]
    pub filter: FilterMode,
}

impl Sampler {
    pub fn new(address_mode: AddressMode, filter: FilterMode) -> Self {
        Self {
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            filter,
        }
    }

    #[inline]
    fn fetch(&self, texture: &Texture, x: i64, y: i64) -> Vector4<f32> {
        texture.texel(
            self.address_mode_u.apply(x, texture.width),
            self.address_mode_v.apply(y, texture.height),
        )
    }

    /// Samples `texture` at `uv`, where (0, 0) is the top-left corner.
    pub fn sample(&self, texture: &Texture, uv: Vector2<f32>) -> Vector4<f32> {
        let x = uv.x * texture.width as f32;
        let y = uv.y * texture.height as f32;

        match self.filter {
            FilterMode::Nearest => self.fetch(texture, x.floor() as i64, y.floor() as i64),
            FilterMode::Linear => {
                // Texel centers sit at half-integers.
                let x = x - 0.5;
                let y = y - 0.5;
                let (x0, y0) = (x.floor(), y.floor());
                let (wx, wy) = (x - x0, y - y0);
                // Huge or infinite coordinates saturate the cast.
                let (x0, y0) = (x0 as i64, y0 as i64);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

                let c00 = self.fetch(texture, x0, y0);
                let c10 = self.fetch(texture, x1, y0);
                let c01 = self.fetch(texture, x0, y1);
                let c11 = self.fetch(texture, x1, y1);

                let top = c00 * (1.0 - wx) + c10 * wx;
                let bottom = c01 * (1.0 - wx) + c11 * wx;
                top * (1.0 - wy) + bottom * wy
            }
        }
    }
}
