use crate::core::geometry::{InstanceTransform, LitVertex, UnlitVertex};
use crate::error::Result;
use crate::layout::vertex::{
    InstanceRaw, LitVertexRaw, UnlitVertexRaw, VertexBufferLayout, decode_records,
};
use crate::pipeline::renderer::Renderer;
use crate::pipeline::setup::{PipelineDescriptor, Variant};
use crate::pipeline::shaders::lit::LitShader;
use crate::pipeline::shaders::unlit::UnlitShader;
use crate::scene::context::RenderContext;
use crate::scene::instance::ModelTransform;
use crate::scene::mesh::Mesh;
use bytemuck::Pod;
use log::debug;
use nalgebra::Vector4;

const UNLIT_PACKED: [VertexBufferLayout<'static>; 1] = [UnlitVertexRaw::LAYOUT];
const LIT_PACKED: [VertexBufferLayout<'static>; 2] = [LitVertexRaw::LAYOUT, InstanceRaw::LAYOUT];

/// Layouts of the records `render_main_pass` packs for `variant`, by buffer slot.
pub fn packed_vertex_buffers(variant: Variant) -> &'static [VertexBufferLayout<'static>] {
    match variant {
        Variant::Unlit => &UNLIT_PACKED,
        Variant::Lit => &LIT_PACKED,
    }
}

/// Vertex fetch: reads packed buffer records back into stage inputs.
fn fetch<R: Pod, T: From<R>>(bytes: &[u8]) -> Result<Vec<T>> {
    Ok(decode_records::<R>(bytes)?.into_iter().map(T::from).collect())
}

/// Packs the scene's vertices and instances into the byte layout `pipeline`
/// declares, then draws them with the variant's shader.
pub fn render_main_pass(
    pipeline: &PipelineDescriptor,
    context: &RenderContext,
    renderer: &mut Renderer,
    clear_color: Vector4<f32>,
) -> Result<()> {
    renderer.clear(clear_color);
    let camera = context.camera.uniform();

    match pipeline.variant {
        Variant::Unlit => {
            let raw: Vec<UnlitVertexRaw> = context
                .mesh
                .vertices
                .iter()
                .map(|v| UnlitVertexRaw::from(&v.to_unlit()))
                .collect();
            let vertices: Vec<UnlitVertex> = fetch::<UnlitVertexRaw, _>(bytemuck::cast_slice(&raw))?;
            let mesh = Mesh::new(vertices, context.mesh.indices.clone());

            let shader = UnlitShader::new(&context.texture, &context.sampler, &camera);
            renderer.draw(&mesh, &[()], &shader);
        }
        Variant::Lit => {
            let raw: Vec<LitVertexRaw> = context.mesh.vertices.iter().map(LitVertexRaw::from).collect();
            let vertices: Vec<LitVertex> = fetch::<LitVertexRaw, _>(bytemuck::cast_slice(&raw))?;
            let mesh = Mesh::new(vertices, context.mesh.indices.clone());

            let raw_instances: Vec<InstanceRaw> =
                context.instances.iter().map(ModelTransform::to_raw).collect();
            let instances: Vec<InstanceTransform> =
                fetch::<InstanceRaw, _>(bytemuck::cast_slice(&raw_instances))?;

            let light = context.light.uniform();
            let shader = LitShader::new(&context.texture, &context.sampler, &camera, &light);
            renderer.draw(&mesh, &instances, &shader);
        }
    }

    debug!(
        "{} pass: {} vertex bytes per vertex",
        pipeline.variant.name(),
        packed_vertex_buffers(pipeline.variant)[0].array_stride
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::setup::create_pipeline;

    #[test]
    fn packed_records_satisfy_both_pipelines() {
        for variant in [Variant::Unlit, Variant::Lit] {
            let pipeline = create_pipeline(variant, packed_vertex_buffers(variant)).unwrap();
            assert_eq!(pipeline.vertex_buffers.len(), packed_vertex_buffers(variant).len());
        }
    }

    #[test]
    fn lit_records_do_not_satisfy_the_unlit_pipeline() {
        assert!(create_pipeline(Variant::Unlit, packed_vertex_buffers(Variant::Lit)).is_err());
    }
}
