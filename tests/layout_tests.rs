use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use shading_core::ShadingError;
use shading_core::core::geometry::LitVertex;
use shading_core::layout::bindings::{ResourceKind, Visibility, binding_slots};
use shading_core::layout::reflect::{reflect_source, wgsl_source};
use shading_core::layout::uniforms::{CameraUniform, LightUniform};
use shading_core::layout::vertex::{
    InstanceRaw, LitVertexRaw, UnlitVertexRaw, VertexFormat, VertexStepMode, decode_records,
    vertex_buffers,
};
use shading_core::pipeline::passes::packed_vertex_buffers;
use shading_core::pipeline::setup::{Variant, create_pipeline};
use shading_core::scene::instance::ModelTransform;

fn f32_at(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[test]
fn binding_table_matches_both_variants() {
    let expect = |variant| {
        binding_slots(variant)
            .iter()
            .map(|s| (s.group, s.binding, s.resource, s.visibility))
            .collect::<Vec<_>>()
    };

    let common = vec![
        (0, 0, ResourceKind::Texture2dFloat, Visibility::Fragment),
        (0, 1, ResourceKind::FilteringSampler, Visibility::Fragment),
        (1, 0, ResourceKind::UniformBuffer { size: 64 }, Visibility::Vertex),
    ];
    assert_eq!(expect(Variant::Unlit), common);

    let mut lit = common.clone();
    lit.push((2, 0, ResourceKind::UniformBuffer { size: 32 }, Visibility::Fragment));
    assert_eq!(expect(Variant::Lit), lit);
}

#[test]
fn vertex_locations_match_both_variants() {
    let locations = |variant| {
        vertex_buffers(variant)
            .iter()
            .flat_map(|b| b.attributes.iter().map(move |a| (a.shader_location, a.format, b.step_mode)))
            .collect::<Vec<_>>()
    };

    use VertexFormat::*;
    use VertexStepMode::*;
    assert_eq!(
        locations(Variant::Unlit),
        vec![(0, Float32x3, Vertex), (1, Float32x2, Vertex)]
    );
    assert_eq!(
        locations(Variant::Lit),
        vec![
            (0, Float32x3, Vertex),
            (1, Float32x2, Vertex),
            (2, Float32x3, Vertex),
            (3, Float32x4, Instance),
            (4, Float32x4, Instance),
            (5, Float32x4, Instance),
            (6, Float32x4, Instance),
            (7, Float32x3, Instance),
            (8, Float32x3, Instance),
            (9, Float32x3, Instance),
        ]
    );
}

#[test]
fn uniform_structs_have_wgsl_sizes() {
    assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    assert_eq!(std::mem::size_of::<LightUniform>(), 32);

    let light = LightUniform::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.5, 0.25, 0.125));
    let bytes = bytemuck::bytes_of(&light);
    assert_eq!(f32_at(bytes, 8), 3.0);
    assert_eq!(f32_at(bytes, 16), 0.5);
    assert_eq!(f32_at(bytes, 24), 0.125);
}

#[test]
fn camera_matrix_is_uploaded_column_major() {
    let translation = Matrix4::new_translation(&Vector3::new(7.0, 8.0, 9.0));
    let camera = CameraUniform::new(translation);
    let bytes = bytemuck::bytes_of(&camera);
    // Column 3 holds the translation.
    assert_eq!(f32_at(bytes, 48), 7.0);
    assert_eq!(f32_at(bytes, 52), 8.0);
    assert_eq!(f32_at(bytes, 56), 9.0);
    assert_eq!(f32_at(bytes, 60), 1.0);
}

#[test]
fn instance_record_puts_translation_at_location_six() {
    let raw = ModelTransform::from_trs(
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::zeros(),
        Vector3::new(2.0, 2.0, 2.0),
    )
    .to_raw();
    let bytes = bytemuck::bytes_of(&raw);
    assert_eq!(bytes.len(), 100);

    let location_offset = |loc: u32| {
        InstanceRaw::LAYOUT
            .attributes
            .iter()
            .find(|a| a.shader_location == loc)
            .map(|a| a.offset as usize)
            .unwrap()
    };
    let t = location_offset(6);
    assert_eq!(
        [f32_at(bytes, t), f32_at(bytes, t + 4), f32_at(bytes, t + 8)],
        [1.0, 2.0, 3.0]
    );
    // Uniform scale 2: normal matrix is diag(0.5).
    let n0 = location_offset(7);
    assert_eq!(f32_at(bytes, n0), 0.5);
    assert_eq!(f32_at(bytes, location_offset(9) + 8), 0.5);
}

#[test]
fn packed_vertex_bytes_decode_to_the_same_vertices() {
    let vertices = [
        LitVertex::new(Point3::new(1.0, 2.0, 3.0), Vector2::new(0.25, 0.75), Vector3::z()),
        LitVertex::new(Point3::new(-1.0, 0.0, 0.5), Vector2::new(1.0, 0.0), Vector3::x()),
    ];
    let raw: Vec<LitVertexRaw> = vertices.iter().map(LitVertexRaw::from).collect();
    let bytes: &[u8] = bytemuck::cast_slice(&raw);
    assert_eq!(bytes.len(), 64);

    // Misaligned on purpose.
    let mut shifted = vec![0u8; 1];
    shifted.extend_from_slice(bytes);
    let decoded: Vec<LitVertex> = decode_records::<LitVertexRaw>(&shifted[1..])
        .unwrap()
        .into_iter()
        .map(LitVertex::from)
        .collect();
    assert_eq!(decoded, vertices);
}

#[test]
fn truncated_vertex_buffer_is_a_layout_error() {
    let err = decode_records::<UnlitVertexRaw>(&[0u8; 30]).unwrap_err();
    assert!(matches!(err, ShadingError::BufferLayout(_)));
}

#[test]
fn pipeline_creation_validates_shader_and_buffers() {
    create_pipeline(Variant::Unlit, packed_vertex_buffers(Variant::Unlit)).unwrap();
    let lit = create_pipeline(Variant::Lit, packed_vertex_buffers(Variant::Lit)).unwrap();
    assert_eq!(lit.bindings.len(), 4);
    assert_eq!(lit.interface.vertex_inputs.len(), 10);

    let err = create_pipeline(Variant::Unlit, vertex_buffers(Variant::Lit)).unwrap_err();
    assert!(matches!(err, ShadingError::BufferLayout(_)));
}

#[test]
fn light_uniform_moved_to_another_group_is_rejected() {
    let edited = wgsl_source(Variant::Lit).replace("@group(2) @binding(0)", "@group(3) @binding(0)");
    let err = reflect_source("lit (edited)", &edited)
        .and_then(|interface| interface.check_against(Variant::Lit))
        .unwrap_err();
    assert!(matches!(
        err,
        ShadingError::BindingMismatch { group: 2, binding: 0, .. }
    ));
}

#[test]
fn light_read_from_vertex_stage_is_rejected() {
    let edited = wgsl_source(Variant::Lit).replace(
        "out.clip_position = camera.view_proj * world_position;",
        "out.clip_position = camera.view_proj * world_position * light.position.x;",
    );
    let err = reflect_source("lit (edited)", &edited)
        .and_then(|interface| interface.check_against(Variant::Lit))
        .unwrap_err();
    assert!(matches!(
        err,
        ShadingError::BindingMismatch { group: 2, binding: 0, .. }
    ));
}

#[test]
fn shader_missing_fragment_entry_point_is_rejected() {
    let edited = wgsl_source(Variant::Unlit).replace("fn fs_main", "fn fs_other");
    let err = reflect_source("unlit (edited)", &edited).unwrap_err();
    assert!(matches!(err, ShadingError::ShaderValidation { .. }));
}
