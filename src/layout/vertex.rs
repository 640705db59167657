use crate::core::geometry::{InstanceTransform, LitVertex, UnlitVertex};
use crate::error::{Result, ShadingError};
use crate::layout::Variant;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix3, Matrix4, Point3, Vector2, Vector3};
use std::mem::size_of;

//=================================
// Layout Descriptors
//=================================

/// Attribute formats used by the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }

    pub const fn components(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 2,
            VertexFormat::Float32x3 => 3,
            VertexFormat::Float32x4 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexStepMode {
    Vertex,
    Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub format: VertexFormat,
    pub offset: u64,
    pub shader_location: u32,
}

/// How one vertex buffer is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferLayout<'a> {
    pub array_stride: u64,
    pub step_mode: VertexStepMode,
    pub attributes: &'a [VertexAttribute],
}

const fn attr(shader_location: u32, format: VertexFormat, offset: u64) -> VertexAttribute {
    VertexAttribute {
        format,
        offset,
        shader_location,
    }
}

//=================================
// Raw Records
//=================================

/// Buffer 0 record of the unlit variant.
///
/// ```text
/// offset 0   position   Float32x3  @location(0)
/// offset 12  tex_coord  Float32x2  @location(1)
/// stride 20
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct UnlitVertexRaw {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl UnlitVertexRaw {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: size_of::<UnlitVertexRaw>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &[
            attr(0, VertexFormat::Float32x3, 0),
            attr(1, VertexFormat::Float32x2, 12),
        ],
    };
}

impl From<UnlitVertexRaw> for UnlitVertex {
    fn from(raw: UnlitVertexRaw) -> Self {
        UnlitVertex::new(Point3::from(raw.position), Vector2::from(raw.tex_coord))
    }
}

impl From<&UnlitVertex> for UnlitVertexRaw {
    fn from(v: &UnlitVertex) -> Self {
        Self {
            position: v.position.coords.into(),
            tex_coord: v.tex_coord.into(),
        }
    }
}

/// Buffer 0 record of the lit variant.
///
/// ```text
/// offset 0   position   Float32x3  @location(0)
/// offset 12  tex_coord  Float32x2  @location(1)
/// offset 20  normal     Float32x3  @location(2)
/// stride 32
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct LitVertexRaw {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl LitVertexRaw {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: size_of::<LitVertexRaw>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &[
            attr(0, VertexFormat::Float32x3, 0),
            attr(1, VertexFormat::Float32x2, 12),
            attr(2, VertexFormat::Float32x3, 20),
        ],
    };
}

impl From<LitVertexRaw> for LitVertex {
    fn from(raw: LitVertexRaw) -> Self {
        LitVertex::new(
            Point3::from(raw.position),
            Vector2::from(raw.tex_coord),
            Vector3::from(raw.normal),
        )
    }
}

impl From<&LitVertex> for LitVertexRaw {
    fn from(v: &LitVertex) -> Self {
        Self {
            position: v.position.coords.into(),
            tex_coord: v.tex_coord.into(),
            normal: v.normal.into(),
        }
    }
}

/// Buffer 1 (per-instance) record of the lit variant.
///
/// Both matrices are split into columns, one attribute per column, in the
/// order WGSL's `mat4x4(c0, c1, c2, c3)` / `mat3x3(c0, c1, c2)` rebuild them:
/// ```text
/// offset 0..64    model columns 0-3    Float32x4  @location(3..=6)
/// offset 64..100  normal columns 0-2   Float32x3  @location(7..=9)
/// stride 100
/// ```
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: size_of::<InstanceRaw>() as u64,
        step_mode: VertexStepMode::Instance,
        attributes: &[
            attr(3, VertexFormat::Float32x4, 0),
            attr(4, VertexFormat::Float32x4, 16),
            attr(5, VertexFormat::Float32x4, 32),
            attr(6, VertexFormat::Float32x4, 48),
            attr(7, VertexFormat::Float32x3, 64),
            attr(8, VertexFormat::Float32x3, 76),
            attr(9, VertexFormat::Float32x3, 88),
        ],
    };
}

impl From<&InstanceTransform> for InstanceRaw {
    fn from(t: &InstanceTransform) -> Self {
        Self {
            model: t.model.into(),
            normal: t.normal.into(),
        }
    }
}

/// Reassembles the matrices column by column, mirroring the shader.
impl From<InstanceRaw> for InstanceTransform {
    fn from(raw: InstanceRaw) -> Self {
        InstanceTransform {
            model: Matrix4::from(raw.model),
            normal: Matrix3::from(raw.normal),
        }
    }
}

const UNLIT_BUFFERS: [VertexBufferLayout<'static>; 1] = [UnlitVertexRaw::LAYOUT];
const LIT_BUFFERS: [VertexBufferLayout<'static>; 2] = [LitVertexRaw::LAYOUT, InstanceRaw::LAYOUT];

/// Vertex buffers a variant reads, indexed by buffer slot.
pub fn vertex_buffers(variant: Variant) -> &'static [VertexBufferLayout<'static>] {
    match variant {
        Variant::Unlit => &UNLIT_BUFFERS,
        Variant::Lit => &LIT_BUFFERS,
    }
}

//=================================
// Byte Buffers
//=================================

/// Reads tightly packed records out of a host byte buffer.
///
/// The buffer need not be aligned; its length must be a whole number of
/// records.
pub fn decode_records<R: Pod>(bytes: &[u8]) -> Result<Vec<R>> {
    let stride = size_of::<R>();
    if stride == 0 || bytes.len() % stride != 0 {
        return Err(ShadingError::BufferLayout(format!(
            "{} bytes is not a multiple of the {}-byte stride",
            bytes.len(),
            stride
        )));
    }
    Ok(bytes
        .chunks_exact(stride)
        .map(bytemuck::pod_read_unaligned::<R>)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::{TransformFactory, normal_matrix};

    fn assert_tightly_packed(layout: &VertexBufferLayout) {
        let mut offset = 0;
        for a in layout.attributes {
            assert_eq!(a.offset, offset, "location {}", a.shader_location);
            offset += a.format.size();
        }
        assert_eq!(offset, layout.array_stride);
    }

    #[test]
    fn strides_match_record_sizes() {
        assert_eq!(UnlitVertexRaw::LAYOUT.array_stride, 20);
        assert_eq!(LitVertexRaw::LAYOUT.array_stride, 32);
        assert_eq!(InstanceRaw::LAYOUT.array_stride, 100);
        assert_tightly_packed(&UnlitVertexRaw::LAYOUT);
        assert_tightly_packed(&LitVertexRaw::LAYOUT);
        assert_tightly_packed(&InstanceRaw::LAYOUT);
    }

    #[test]
    fn instance_reassembly_matches_host_decomposition() {
        let model = TransformFactory::translation(&Vector3::new(1.0, 2.0, 3.0))
            * TransformFactory::rotation_z(0.3)
            * TransformFactory::scaling_nonuniform(&Vector3::new(1.0, 2.0, 0.5));
        let transform = InstanceTransform::new(model, normal_matrix(&model));

        let raw = InstanceRaw::from(&transform);
        // Column 3 of the model matrix carries the translation.
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);

        let bytes = bytemuck::bytes_of(&raw).to_vec();
        let decoded: Vec<InstanceRaw> = decode_records(&bytes).unwrap();
        assert_eq!(InstanceTransform::from(decoded[0]), transform);
    }

    #[test]
    fn decoding_rejects_partial_records() {
        let bytes = vec![0u8; 33];
        let err = decode_records::<LitVertexRaw>(&bytes).unwrap_err();
        assert!(matches!(err, ShadingError::BufferLayout(_)));
    }

    #[test]
    fn decoding_handles_unaligned_buffers() {
        let vertex = LitVertexRaw {
            position: [1.0, 2.0, 3.0],
            tex_coord: [0.25, 0.75],
            normal: [0.0, 1.0, 0.0],
        };
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(bytemuck::bytes_of(&vertex));
        let decoded: Vec<LitVertexRaw> = decode_records(&bytes[1..]).unwrap();
        assert_eq!(decoded, vec![vertex]);
    }
}
