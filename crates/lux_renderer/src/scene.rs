//! Scene container: every registered shape, a BVH over the triangles, and
//! the point light.

use std::sync::Arc;

use lux_math::{Ray, Vec3};

use crate::bvh::Bvh;
use crate::hittable::{Hittable, Shape, Surface};
use crate::Triangle;

/// Offset applied to shadow ray origins so they do not re-hit the surface
/// they start on.
const SHADOW_BIAS: f64 = 1e-6;

/// The world being rendered.
///
/// Shapes are only ever appended. Triangles are intersected through the
/// BVH, which must be (re)built with [`Scene::build_bvh`] after adding them;
/// all other shapes are tested one by one.
#[derive(Debug)]
pub struct Scene {
    /// Every registered shape, in insertion order
    shapes: Vec<Shape>,
    /// Triangles, shared with `shapes`, for the BVH
    triangles: Vec<Arc<Triangle>>,
    /// Indices into `shapes` of everything that is not a triangle
    brute_force: Vec<usize>,
    bvh: Option<Bvh>,
    light: Vec3,
}

impl Scene {
    /// Create an empty scene lit by a point light at `light`.
    pub fn new(light: Vec3) -> Self {
        Self {
            shapes: Vec::new(),
            triangles: Vec::new(),
            brute_force: Vec::new(),
            bvh: None,
            light,
        }
    }

    /// Register a shape. Triangles become BVH candidates; anything else
    /// joins the brute-force list.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) {
        let shape = shape.into();
        match shape.as_triangle() {
            Some(triangle) => self.triangles.push(Arc::clone(triangle)),
            None => self.brute_force.push(self.shapes.len()),
        }
        self.shapes.push(shape);
    }

    /// Build the BVH over the triangles registered so far, replacing any
    /// previous tree.
    pub fn build_bvh(&mut self) {
        let bvh = Bvh::build(&self.triangles);
        let stats = bvh.stats();
        log::debug!(
            "Built BVH over {} triangles: {} nodes, {} leaves, depth {}",
            bvh.triangle_count(),
            stats.nodes,
            stats.leaves,
            stats.depth
        );
        self.bvh = Some(bvh);
    }

    /// True when triangles were added after the last BVH build (or none was
    /// built), so some of them cannot be hit.
    pub fn is_bvh_stale(&self) -> bool {
        let built = self.bvh.as_ref().map_or(0, Bvh::triangle_count);
        built != self.triangles.len()
    }

    /// Nearest shape along `ray` and its distance, or `(None, f64::INFINITY)`.
    ///
    /// Brute-force shapes only count with a positive distance, which is
    /// where planes behind the ray origin are discarded.
    pub fn intersect(&self, ray: &Ray) -> (Option<Surface<'_>>, f64) {
        let mut closest = f64::INFINITY;
        let mut surface = None;

        if let Some(bvh) = &self.bvh {
            let (triangle, t) = bvh.intersect(ray);
            if let Some(triangle) = triangle {
                if t.is_finite() && t < closest {
                    closest = t;
                    surface = Some(Surface::Triangle(triangle.as_ref()));
                }
            }
        }

        for &index in &self.brute_force {
            let shape = &self.shapes[index];
            let t = shape.hit(ray);
            if t > 0.0 && t < closest {
                closest = t;
                surface = Some(Surface::Shape(shape));
            }
        }

        (surface, closest)
    }

    /// Whether any shape blocks the segment from `point` to `light`.
    pub fn occluded(&self, point: Vec3, light: Vec3) -> bool {
        let to_light = light - point;
        let distance = to_light.length();
        if distance <= SHADOW_BIAS {
            return false;
        }

        let direction = to_light / distance;
        let ray = Ray::new(point + direction * SHADOW_BIAS, direction);
        let (_, t) = self.intersect(&ray);
        t < distance - SHADOW_BIAS
    }

    pub fn light(&self) -> Vec3 {
        self.light
    }

    pub fn set_light(&mut self, light: Vec3) {
        self.light = light;
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
