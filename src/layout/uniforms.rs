use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3, Vector3};

/// `@group(1) @binding(0)`: world -> clip transform, bound once per frame.
///
/// ```text
/// offset 0   view_proj  mat4x4<f32>  (column-major)   64 bytes
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(view_proj: Matrix4<f32>) -> Self {
        Self {
            view_proj: view_proj.into(),
        }
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        Matrix4::from(self.view_proj)
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

/// `@group(2) @binding(0)`: the single point light of the lit variant.
///
/// WGSL aligns `vec3<f32>` to 16 bytes, so each field carries 4 bytes of
/// explicit padding:
/// ```text
/// offset 0   position  vec3<f32>   12 bytes + 4 pad
/// offset 16  color     vec3<f32>   12 bytes + 4 pad
/// size 32
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    _padding0: u32,
    /// Linear RGB. Unclamped, may exceed 1.0.
    pub color: [f32; 3],
    _padding1: u32,
}

impl LightUniform {
    pub fn new(position: Point3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position: position.coords.into(),
            _padding0: 0,
            color: color.into(),
            _padding1: 0,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    pub fn color(&self) -> Vector3<f32> {
        Vector3::from(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(size_of::<CameraUniform>(), 64);
        assert_eq!(size_of::<LightUniform>(), 32);
        assert_eq!(offset_of!(LightUniform, position), 0);
        assert_eq!(offset_of!(LightUniform, color), 16);
    }

    #[test]
    fn camera_matrix_is_stored_column_major() {
        let m = Matrix4::new(
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        );
        let uniform = CameraUniform::new(m);
        assert_eq!(uniform.view_proj[0], [1.0, 5.0, 9.0, 13.0]);
        assert_eq!(uniform.view_proj(), m);
    }

    #[test]
    fn light_bytes_put_color_after_padding() {
        let light = LightUniform::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.5, 0.25, 2.0));
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&light));
        assert_eq!(&floats[0..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&floats[4..7], &[0.5, 0.25, 2.0]);
    }
}
