use crate::core::geometry::LitVertex;
use crate::error::{Result, ShadingError};
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into one lit mesh, merging all of its models.
///
/// Missing normals default to +Y and missing texture coordinates to (0, 0).
/// OBJ's `v` axis points up, so it is flipped to match textures whose row 0
/// is the top.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh<LitVertex>> {
    let path_obj = path.as_ref();
    let obj_error = |reason: String| ShadingError::Obj {
        path: path_obj.display().to_string(),
        reason,
    };
    if !path_obj.exists() {
        return Err(obj_error("file not found".to_string()));
    }

    info!("Loading OBJ file: {:?}", path_obj);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };

    // Materials are not part of the shading core; the texture comes from config.
    let (models, _materials) =
        tobj::load_obj(path_obj, &load_options).map_err(|e| obj_error(e.to_string()))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0u32;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == num_vertices * 3;
        let has_texcoords = mesh.texcoords.len() == num_vertices * 2;
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 1, 0).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );
            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::y()
            };
            let tex_coord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };
            vertices.push(LitVertex::new(position, tex_coord, normal));
        }

        indices.extend(mesh.indices.iter().map(|i| i + index_offset));
        index_offset += num_vertices as u32;
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total indices: {}",
        vertices.len(),
        indices.len()
    );

    Ok(Mesh::new(vertices, indices))
}
