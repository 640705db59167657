use crate::core::math::transform::{TransformFactory, opengl_to_wgpu_matrix};
use crate::layout::uniforms::CameraUniform;
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    Orthographic { height: f32, aspect_ratio: f32 },
}

/// Host-side camera producing the per-frame [`CameraUniform`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub near: f32,
    pub far: f32,

    pub projection_type: ProjectionType,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            },
        )
    }

    pub fn new_orthographic(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        height: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            },
        )
    }

    fn with_projection(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        near: f32,
        far: f32,
        projection_type: ProjectionType,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            near,
            far,
            projection_type,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Recomputes view and projection after any public field changed.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;
                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        match &mut self.projection_type {
            ProjectionType::Perspective { aspect_ratio, .. }
            | ProjectionType::Orthographic { aspect_ratio, .. } => *aspect_ratio = aspect,
        }
        self.update_matrices();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// World -> clip, with depth mapped to [0, 1].
    pub fn view_projection(&self) -> Matrix4<f32> {
        opengl_to_wgpu_matrix() * self.projection_matrix * self.view_matrix
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view_projection())
    }
}
