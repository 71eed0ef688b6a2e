//! Wavefront OBJ/MTL loading.
//!
//! Geometry errors are fatal. Material and texture problems are not: a
//! missing or broken MTL leaves meshes without a material, and a texture
//! that fails to decode leaves its material untextured.

use std::path::Path;
use std::sync::Arc;

use lux_math::{Vec2, Vec3};
use thiserror::Error;

use crate::material::Material;
use crate::mesh::Mesh;
use crate::texture::TextureCache;

/// Errors that can occur during OBJ loading.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("Failed to load OBJ {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("No geometry found in OBJ file {0}")]
    NoGeometry(String),
}

/// Result type for loading operations.
pub type ObjResult<T> = Result<T, ObjError>;

/// Load an OBJ file, its MTL library and any diffuse textures.
///
/// Faces are triangulated and attributes are re-indexed so that positions,
/// normals and UVs share one index buffer.
pub fn load_obj(path: impl AsRef<Path>) -> ObjResult<Vec<Mesh>> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| ObjError::Load {
        path: display.clone(),
        source,
    })?;

    if models.iter().all(|m| m.mesh.indices.is_empty()) {
        return Err(ObjError::NoGeometry(display));
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let materials = match materials {
        Ok(materials) => convert_materials(&materials, &mut TextureCache::with_base_dir(base_dir)),
        Err(e) => {
            log::warn!("{}: materials unavailable ({}), using flat shading", display, e);
            Vec::new()
        }
    };

    let meshes: Vec<Mesh> = models
        .into_iter()
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| convert_model(model, &materials))
        .collect();

    log::info!(
        "Loaded {}: {} meshes, {} triangles, {} materials",
        display,
        meshes.len(),
        meshes.iter().map(Mesh::triangle_count).sum::<usize>(),
        materials.len()
    );

    Ok(meshes)
}

fn convert_materials(materials: &[tobj::Material], textures: &mut TextureCache) -> Vec<Arc<Material>> {
    materials
        .iter()
        .map(|mtl| {
            let mut material = Material::from(mtl);
            if let Some(texture_path) = mtl.diffuse_texture.as_deref() {
                match textures.load(texture_path) {
                    Ok(texture) => material.texture = Some(texture),
                    Err(e) => log::warn!("Material {}: {}", mtl.name, e),
                }
            }
            Arc::new(material)
        })
        .collect()
}

fn convert_model(model: tobj::Model, materials: &[Arc<Material>]) -> Mesh {
    let mesh = model.mesh;

    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64))
        .collect();

    let normals = (!mesh.normals.is_empty()).then(|| {
        mesh.normals
            .chunks_exact(3)
            .map(|n| Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64))
            .collect::<Vec<_>>()
    });

    let mut out = Mesh::new(positions, mesh.indices, normals).with_name(model.name);

    if !mesh.texcoords.is_empty() {
        let uvs = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| Vec2::new(t[0] as f64, t[1] as f64))
            .collect();
        out = out.with_uvs(uvs);
    }

    match mesh.material_id.map(|id| materials.get(id)) {
        Some(Some(material)) => out = out.with_material(material.clone()),
        Some(None) => log::warn!("Mesh {}: material index out of range", out.name),
        None => {}
    }

    out
}
