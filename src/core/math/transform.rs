use log::warn;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3, Vector4};

/// Remaps OpenGL-style clip depth [-w, w] to the [0, w] range used by the
/// pipeline's depth buffer.
#[rustfmt::skip]
pub fn opengl_to_wgpu_matrix() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

//=================================
// Transform Matrix Factory
//=================================

/// Host-side builders for object, view and projection matrices (right-handed).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation around an arbitrary axis (Rodrigues' formula).
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let a = axis.normalize();
        let (s, c) = angle_rad.sin_cos();
        let t = 1.0 - c;

        Matrix4::new(
            t * a.x * a.x + c,       t * a.x * a.y - a.z * s, t * a.x * a.z + a.y * s, 0.0,
            t * a.x * a.y + a.z * s, t * a.y * a.y + c,       t * a.y * a.z - a.x * s, 0.0,
            t * a.x * a.z - a.y * s, t * a.y * a.z + a.x * s, t * a.z * a.z + c,       0.0,
            0.0,                     0.0,                     0.0,                     1.0,
        )
    }

    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let (s, c) = angle_rad.sin_cos();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// XYZ Euler rotation in degrees, applied as Rx * Ry * Rz.
    pub fn rotation_euler_deg(degrees: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_x(degrees.x.to_radians())
            * Self::rotation_y(degrees.y.to_radians())
            * Self::rotation_z(degrees.z.to_radians())
    }

    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Look-at view matrix. The camera looks down -Z in view space.
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let z_axis = (eye - target).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis);

        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-eye.coords)
    }

    /// OpenGL-style perspective projection (depth to [-1, 1]).
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let nf = 1.0 / (near - far);

        Matrix4::new(
            f / aspect_ratio, 0.0, 0.0,               0.0,
            0.0,              f,   0.0,               0.0,
            0.0,              0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,              0.0, -1.0,              0.0,
        )
    }

    /// OpenGL-style orthographic projection (depth to [-1, 1]).
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let nf = 1.0 / (near - far);

        Matrix4::new(
            2.0 * rl, 0.0,      0.0,      -(right + left) * rl,
            0.0,      2.0 * tb, 0.0,      -(top + bottom) * tb,
            0.0,      0.0,      2.0 * nf, (far + near) * nf,
            0.0,      0.0,      0.0,      1.0,
        )
    }
}

//=================================
// Normal Matrix
//=================================

pub fn upper_left_3x3(m: &Matrix4<f32>) -> Matrix3<f32> {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Inverse-transpose of the model matrix's upper-left 3x3.
///
/// Computed once per instance on the host, never per vertex. A singular
/// model matrix (e.g. a zero scale used to hide an object) has no inverse;
/// the plain 3x3 is used instead, which is only correct without non-uniform
/// scale.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = upper_left_3x3(model);
    match linear.try_inverse() {
        Some(inverse) => inverse.transpose(),
        None => {
            warn!("Model matrix is singular; using its 3x3 block as the normal matrix");
            linear
        }
    }
}

//=================================
// Clip -> Screen
//=================================

/// Clip space to NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// NDC to screen pixels. Screen +Y points down.
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new(
        (ndc_x + 1.0) * 0.5 * width,
        (1.0 - (ndc_y + 1.0) * 0.5) * height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation() {
        let r = TransformFactory::rotation_y(0.7);
        let n = normal_matrix(&r);
        assert!((n - upper_left_3x3(&r)).norm() < 1e-5);
    }

    #[test]
    fn axis_rotation_matches_the_fixed_axis_builders() {
        let about_y = TransformFactory::rotation(&Vector3::new(0.0, 3.0, 0.0), 0.7);
        assert!((about_y - TransformFactory::rotation_y(0.7)).norm() < 1e-6);
        let about_z = TransformFactory::rotation(&Vector3::z(), -1.2);
        assert!((about_z - TransformFactory::rotation_z(-1.2)).norm() < 1e-6);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let m = TransformFactory::scaling_nonuniform(&Vector3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(&m);
        assert!((n[(0, 0)] - 0.5).abs() < 1e-6);
        assert!((n[(1, 1)] - 1.0).abs() < 1e-6);

        // A 45 degree surface normal must stay perpendicular to the stretched surface.
        let tangent = upper_left_3x3(&m) * Vector3::new(1.0, -1.0, 0.0);
        let normal = n * Vector3::new(1.0, 1.0, 0.0);
        assert!(tangent.dot(&normal).abs() < 1e-6);
    }

    #[test]
    fn singular_model_falls_back_to_plain_block() {
        let m = TransformFactory::scaling_nonuniform(&Vector3::zeros());
        assert_eq!(normal_matrix(&m), Matrix3::zeros());
    }

    #[test]
    fn depth_correction_maps_near_and_far_to_unit_range() {
        let proj = opengl_to_wgpu_matrix() * TransformFactory::perspective(1.0, 1.0, 0.1, 100.0);
        let near = proj * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }
}
