//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection, and
//! carries the per-vertex UVs and normals needed for textured, smooth
//! shading.

use std::sync::Arc;

use lux_core::material::{Finish, Material};
use lux_core::mesh::Corner;
use lux_math::{Aabb, Color, Ray, Vec2, Vec3};

use crate::hittable::{Hittable, HIT_EPSILON};

/// Determinant threshold below which a ray counts as parallel to the
/// triangle.
const DETERMINANT_EPSILON: f64 = 1e-7;

/// UVs of the unit triangle, used when a triangle has none of its own.
const DEFAULT_UVS: [Vec2; 3] = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

/// A triangle primitive.
#[derive(Clone, Debug)]
pub struct Triangle {
    /// Vertices
    vertices: [Vec3; 3],
    /// Texture coordinates per vertex
    uvs: [Vec2; 3],
    /// Vertex normals for smooth shading, all three or none
    normals: Option<[Vec3; 3]>,
    /// Shared material, if the triangle came from a mesh with one
    material: Option<Arc<Material>>,
    /// Flat terms used when there is no material
    finish: Finish,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self {
            vertices: [v1, v2, v3],
            uvs: DEFAULT_UVS,
            normals: None,
            material: None,
            finish: Finish::default(),
        }
    }

    /// Build a triangle from mesh corners.
    ///
    /// UVs are used only if all three corners have one, and likewise for
    /// normals.
    pub fn from_corners(corners: [Corner; 3], material: Option<Arc<Material>>) -> Self {
        let [a, b, c] = corners;
        let mut triangle = Self::new(a.position, b.position, c.position);

        if let (Some(ua), Some(ub), Some(uc)) = (a.uv, b.uv, c.uv) {
            triangle.uvs = [ua, ub, uc];
        }
        if let (Some(na), Some(nb), Some(nc)) = (a.normal, b.normal, c.normal) {
            triangle.normals = Some([na, nb, nc]);
        }
        triangle.material = material;
        triangle
    }

    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = uvs;
        self
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    pub fn has_vertex_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Bounding box of the three vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut bbox = Aabb::EMPTY;
        for v in self.vertices {
            bbox.expand_to_include(v);
        }
        bbox
    }

    /// Average of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (a + b + c) / 3.0
    }

    /// Barycentric weights of `p` for the three vertices.
    ///
    /// Each weight is clamped into [0, 1] and the three are rescaled to sum
    /// to 1, which pulls points slightly outside the triangle back onto it.
    pub fn barycentric(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.vertices;
        let v0 = b - a;
        let v1 = c - a;
        let v2 = p - a;

        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);
        let denom = d00 * d11 - d01 * d01;

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;

        let weights = Vec3::new(u, v, w).clamp(Vec3::ZERO, Vec3::ONE);
        weights / (weights.x + weights.y + weights.z)
    }

    /// Texture coordinates at `p`, wrapped into [0, 1) for tiling.
    pub fn uv_at(&self, p: Vec3) -> Vec2 {
        let weights = self.barycentric(p);
        let uv = self.uvs[0] * weights.x + self.uvs[1] * weights.y + self.uvs[2] * weights.z;
        uv - uv.floor()
    }

    /// Smooth-shading normal at `p`, if the triangle has vertex normals.
    pub fn interpolated_normal(&self, p: Vec3) -> Option<Vec3> {
        let [na, nb, nc] = self.normals?;
        let weights = self.barycentric(p);
        let n = na * weights.x + nb * weights.y + nc * weights.z;
        Some(n / n.length())
    }

    /// Ambient color from the material, or the neutral ambient.
    pub fn ambient(&self) -> Color {
        self.material
            .as_ref()
            .map_or(Finish::NEUTRAL.ambient, |m| m.ambient_color())
    }

    /// Diffuse color from the material, or the neutral diffuse.
    pub fn diffuse(&self) -> Color {
        self.material
            .as_ref()
            .map_or(Finish::NEUTRAL.diffuse, |m| m.diffuse_color())
    }

    /// Specular color from the material, or the neutral specular.
    pub fn specular(&self) -> Color {
        self.material
            .as_ref()
            .map_or(Finish::NEUTRAL.specular, |m| m.specular_color())
    }

    pub fn shininess(&self) -> f64 {
        self.material
            .as_ref()
            .map_or(Finish::NEUTRAL.shininess, |m| m.shininess)
    }

    /// Phong terms from the material at `p`, sampling its texture at the
    /// interpolated UV. `None` when the triangle has no material.
    pub fn material_finish(&self, p: Vec3) -> Option<Finish> {
        let material = self.material.as_ref()?;
        if material.has_texture() {
            let uv = self.uv_at(p);
            Some(material.finish_at(uv.x, uv.y))
        } else {
            Some(Finish {
                ambient: self.ambient(),
                diffuse: self.diffuse(),
                specular: self.specular(),
                shininess: self.shininess(),
            })
        }
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray) -> f64 {
        let [v1, v2, v3] = self.vertices;
        let edge1 = v2 - v1;
        let edge2 = v3 - v1;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < DETERMINANT_EPSILON {
            return f64::INFINITY;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v1;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if !(0.0..=1.0).contains(&u) {
            return f64::INFINITY;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < 0.0 || u + v > 1.0 {
            return f64::INFINITY;
        }

        let t = f * edge2.dot(q);
        if t > HIT_EPSILON {
            t
        } else {
            f64::INFINITY
        }
    }

    /// Face normal. A degenerate triangle yields the zero vector.
    fn normal(&self, _point: Vec3) -> Vec3 {
        let [v1, v2, v3] = self.vertices;
        let n = (v2 - v1).cross(v3 - v1);
        let length = n.length();
        if length == 0.0 {
            n
        } else {
            n / length
        }
    }

    fn finish(&self) -> &Finish {
        &self.finish
    }
}
