//! A mesh registered as a single brute-force shape.

use lux_core::material::Finish;
use lux_core::Mesh;
use lux_math::{Ray, Vec3};

use crate::hittable::Hittable;
use crate::Triangle;

/// A group of triangles tested one by one, without a BVH.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    finish: Finish,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            finish: Finish::default(),
        }
    }

    /// Build from a loaded mesh. Every triangle shares the mesh's material.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles = mesh
            .triangles()
            .map(|corners| Triangle::from_corners(corners, mesh.material.clone()))
            .collect();
        Self::new(triangles)
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Hittable for TriangleMesh {
    fn hit(&self, ray: &Ray) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| triangle.hit(ray))
            .fold(f64::INFINITY, f64::min)
    }

    /// Normal of the triangle whose centroid lies nearest `point`.
    ///
    /// This approximates "the triangle that was hit" and can pick a
    /// neighbour on meshes with long thin faces.
    fn normal(&self, point: Vec3) -> Vec3 {
        let mut nearest = None;
        let mut best = f64::INFINITY;
        for triangle in &self.triangles {
            let distance = triangle.centroid().distance_squared(point);
            if distance < best {
                best = distance;
                nearest = Some(triangle);
            }
        }
        nearest.map_or(Vec3::ZERO, |triangle| triangle.normal(point))
    }

    fn finish(&self) -> &Finish {
        &self.finish
    }
}
