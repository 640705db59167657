use crate::error::{Result, ShadingError};
use crate::layout::bindings::{BindingSlot, binding_slots};
use crate::layout::reflect::{ShaderInterface, check_module};
use crate::layout::vertex::{VertexBufferLayout, vertex_buffers};
use crate::layout::{FRAGMENT_ENTRY_POINT, VERTEX_ENTRY_POINT};
use log::info;

pub use crate::layout::Variant;

/// A pipeline whose shader module, bind group layouts and vertex buffer
/// layouts have been checked against each other.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor {
    pub variant: Variant,
    pub vertex_entry_point: &'static str,
    pub fragment_entry_point: &'static str,
    pub bindings: &'static [BindingSlot],
    pub vertex_buffers: &'static [VertexBufferLayout<'static>],
    pub interface: ShaderInterface,
}

impl PipelineDescriptor {
    pub fn bind_group_count(&self) -> u32 {
        crate::layout::bindings::bind_group_count(self.variant)
    }
}

/// Creates the pipeline for `variant`, given the vertex buffer layouts the
/// host intends to bind.
///
/// Any mismatch is fatal here, before the first draw: WGSL that fails to parse
/// or validate, a binding slot or uniform size the shader disagrees with, or a
/// host buffer whose stride, step mode, locations, formats or offsets differ
/// from the declared layout.
pub fn create_pipeline(
    variant: Variant,
    host_vertex_buffers: &[VertexBufferLayout<'_>],
) -> Result<PipelineDescriptor> {
    let interface = check_module(variant)?;
    let declared = vertex_buffers(variant);
    check_host_buffers(declared, host_vertex_buffers)?;

    info!(
        "Created {} pipeline: {} bind groups, {} vertex buffers",
        variant.name(),
        crate::layout::bindings::bind_group_count(variant),
        declared.len()
    );

    Ok(PipelineDescriptor {
        variant,
        vertex_entry_point: VERTEX_ENTRY_POINT,
        fragment_entry_point: FRAGMENT_ENTRY_POINT,
        bindings: binding_slots(variant),
        vertex_buffers: declared,
        interface,
    })
}

fn check_host_buffers(
    declared: &[VertexBufferLayout<'_>],
    host: &[VertexBufferLayout<'_>],
) -> Result<()> {
    if declared.len() != host.len() {
        return Err(ShadingError::BufferLayout(format!(
            "pipeline reads {} vertex buffers, host supplies {}",
            declared.len(),
            host.len()
        )));
    }

    for (slot, (want, got)) in declared.iter().zip(host).enumerate() {
        if want.array_stride != got.array_stride {
            return Err(ShadingError::BufferLayout(format!(
                "buffer {}: stride {} expected, got {}",
                slot, want.array_stride, got.array_stride
            )));
        }
        if want.step_mode != got.step_mode {
            return Err(ShadingError::BufferLayout(format!(
                "buffer {}: step mode {:?} expected, got {:?}",
                slot, want.step_mode, got.step_mode
            )));
        }

        for attr in want.attributes {
            let location = attr.shader_location;
            let Some(found) = got.attributes.iter().find(|a| a.shader_location == location) else {
                return Err(ShadingError::AttributeMismatch {
                    location,
                    reason: format!("missing from host buffer {}", slot),
                });
            };
            if found.format != attr.format {
                return Err(ShadingError::AttributeMismatch {
                    location,
                    reason: format!("format {:?} expected, got {:?}", attr.format, found.format),
                });
            }
            if found.offset != attr.offset {
                return Err(ShadingError::AttributeMismatch {
                    location,
                    reason: format!("offset {} expected, got {}", attr.offset, found.offset),
                });
            }
        }

        if let Some(extra) = got
            .attributes
            .iter()
            .find(|a| !want.attributes.iter().any(|w| w.shader_location == a.shader_location))
        {
            return Err(ShadingError::AttributeMismatch {
                location: extra.shader_location,
                reason: format!("not declared for buffer {}", slot),
            });
        }
    }
    Ok(())
}
