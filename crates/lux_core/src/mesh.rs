//! Indexed triangle mesh as produced by the asset loaders.
//!
//! The renderer turns each index triple into one triangle primitive; this
//! type only keeps the raw, loader-facing arrays.

use std::sync::Arc;

use lux_math::{Aabb, Vec2, Vec3};

use crate::material::Material;

/// One corner of a triangle, with whatever attributes the mesh provides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub normal: Option<Vec3>,
    pub uv: Option<Vec2>,
}

/// A mesh consisting of vertex positions, optional normals and UVs, and
/// triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Object or group name from the source file
    pub name: String,

    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional, one per vertex)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional, one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Material shared by every triangle of the mesh
    pub material: Option<Arc<Material>>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            name: String::new(),
            positions,
            normals,
            uvs: None,
            indices,
            material: None,
            bounds,
        }
    }

    /// Set the UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Set the shared material.
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Compute axis-aligned bounding box from positions.
    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for pos in positions {
            bounds.expand_to_include(*pos);
        }
        bounds
    }

    /// Check if the mesh has a normal for every vertex.
    pub fn has_normals(&self) -> bool {
        matches!(&self.normals, Some(normals) if normals.len() == self.positions.len())
    }

    /// Check if the mesh has a UV for every vertex.
    pub fn has_uvs(&self) -> bool {
        matches!(&self.uvs, Some(uvs) if uvs.len() == self.positions.len())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over triangles as three corners each.
    ///
    /// Faces with out-of-range indices are skipped with a warning. Normals
    /// and UVs are only reported when they cover every vertex.
    pub fn triangles(&self) -> impl Iterator<Item = [Corner; 3]> + '_ {
        let normals = self.normals.as_deref().filter(|_| self.has_normals());
        let uvs = self.uvs.as_deref().filter(|_| self.has_uvs());

        self.indices.chunks_exact(3).filter_map(move |face| {
            let vertex_count = self.positions.len();
            if face.iter().any(|&i| i as usize >= vertex_count) {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    face,
                    vertex_count
                );
                return None;
            }

            let corner = |i: u32| {
                let i = i as usize;
                Corner {
                    position: self.positions[i],
                    normal: normals.map(|n| n[i]),
                    uv: uvs.map(|uv| uv[i]),
                }
            };
            Some([corner(face[0]), corner(face[1]), corner(face[2])])
        })
    }
}
