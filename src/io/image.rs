use crate::core::color::encode_rgba8_srgb;
use crate::error::{Result, ShadingError};
use image::{ImageBuffer, Rgba};
use log::info;
use nalgebra::Vector4;
use std::path::Path;

/// Writes linear RGBA pixels (row-major, top row first) as an sRGB PNG.
///
/// This is the render target format boundary: values are clamped to [0, 1]
/// here and nowhere earlier.
pub fn save_rgba_image<P: AsRef<Path>>(
    pixels: &[Vector4<f32>],
    width: usize,
    height: usize,
    path: P,
) -> Result<()> {
    let path_ref = path.as_ref();
    let img_buf = to_rgba8(pixels, width, height);

    img_buf
        .save(path_ref)
        .map_err(|source| ShadingError::ImageOutput {
            path: path_ref.display().to_string(),
            source,
        })?;
    info!("Saved {}x{} image to {:?}", width, height, path_ref);
    Ok(())
}

/// Encodes pixels into an 8-bit sRGB buffer. Missing pixels stay transparent black.
pub fn to_rgba8(
    pixels: &[Vector4<f32>],
    width: usize,
    height: usize,
) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let mut img_buf = ImageBuffer::new(width as u32, height as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let idx = (y as usize) * width + (x as usize);
        if let Some(color) = pixels.get(idx) {
            *pixel = Rgba(encode_rgba8_srgb(color));
        }
    }
    img_buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overbright_values_clamp_only_at_encode() {
        let pixels = [Vector4::new(1.05, 0.0, 1.0, 0.5), Vector4::new(0.04, 0.04, 0.04, 1.0)];
        let img = to_rgba8(&pixels, 2, 1);
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(0, 0)[1], 0);
        assert_eq!(img.get_pixel(0, 0)[3], 128);
        assert!(img.get_pixel(1, 0)[0] > 10);
    }
}
