use nalgebra::Vector4;

/// Decodes one sRGB-encoded channel in [0, 1] to linear.
/// Same transfer function a `*UnormSrgb` texture applies on sampling.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encodes one linear channel to sRGB. Input is clamped to [0, 1] first,
/// which is the only place color is ever clamped.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantizes a linear RGBA color the way an `Rgba8UnormSrgb` render target
/// stores it: RGB is sRGB encoded, alpha stays linear.
pub fn encode_rgba8_srgb(color: &Vector4<f32>) -> [u8; 4] {
    let q = |v: f32| (v * 255.0 + 0.5) as u8;
    [
        q(linear_to_srgb(color.x)),
        q(linear_to_srgb(color.y)),
        q(linear_to_srgb(color.z)),
        q(color.w.clamp(0.0, 1.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_curve_round_trips_within_quantization() {
        for i in 0..=255u32 {
            let encoded = i as f32 / 255.0;
            let back = linear_to_srgb(srgb_to_linear(encoded));
            assert!((back - encoded).abs() < 1e-4, "channel {}", i);
        }
    }

    #[test]
    fn output_encoding_clamps_hdr_values() {
        let hdr = Vector4::new(1.05, 2.0, -0.5, 1.0);
        assert_eq!(encode_rgba8_srgb(&hdr), [255, 255, 0, 255]);
    }
}
