use crate::layout::uniforms::LightUniform;
use nalgebra::{Point3, Vector3};

/// The single point light of the lit pipeline.
///
/// No attenuation: the light reaches every surface with its full color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    /// Linear RGB.
    pub color: Vector3<f32>,
    /// Scales `color`. The product is not clamped.
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Point3<f32>, color: Vector3<f32>) -> Self {
        Self {
            position,
            color,
            intensity: 1.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn uniform(&self) -> LightUniform {
        LightUniform::new(self.position, self.color * self.intensity)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Point3::new(2.0, 2.0, 2.0), Vector3::new(1.0, 1.0, 1.0))
    }
}
