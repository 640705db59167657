use crate::core::geometry::InstanceTransform;
use crate::core::math::transform::TransformFactory;
use crate::layout::vertex::InstanceRaw;
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// Placement of one mesh instance, split into a local and a world part.
///
/// The final model matrix is `world * local`. The normal matrix is derived
/// here, on the host, each time the instance is written out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub local: Matrix4<f32>,
    pub world: Matrix4<f32>,
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ModelTransform {
    pub fn identity() -> Self {
        Self {
            local: Matrix4::identity(),
            world: Matrix4::identity(),
        }
    }

    pub fn from_world(world: Matrix4<f32>) -> Self {
        Self {
            local: Matrix4::identity(),
            world,
        }
    }

    /// Translation * Rx * Ry * Rz * Scale, rotation in degrees.
    pub fn from_trs(position: Vector3<f32>, rotation_deg: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self::from_world(
            TransformFactory::translation(&position)
                * TransformFactory::rotation_euler_deg(&rotation_deg)
                * TransformFactory::scaling_nonuniform(&scale),
        )
    }

    pub fn translate_local(&mut self, offset: Vector3<f32>) {
        self.local = TransformFactory::translation(&offset) * self.local;
    }

    pub fn translate_world(&mut self, offset: Vector3<f32>) {
        self.world = TransformFactory::translation(&offset) * self.world;
    }

    pub fn scale_local(&mut self, scale: Vector3<f32>) {
        self.local *= TransformFactory::scaling_nonuniform(&scale);
    }

    pub fn scale_world(&mut self, scale: Vector3<f32>) {
        self.world *= TransformFactory::scaling_nonuniform(&scale);
    }

    pub fn rotate_local(&mut self, rotation: UnitQuaternion<f32>) {
        self.local *= rotation.to_homogeneous();
    }

    pub fn rotate_world(&mut self, rotation: UnitQuaternion<f32>) {
        self.world *= rotation.to_homogeneous();
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.world * self.local
    }

    pub fn to_instance(&self) -> InstanceTransform {
        InstanceTransform::from_model(self.model_matrix())
    }

    /// Per-instance vertex buffer record.
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw::from(&self.to_instance())
    }
}
