use crate::{Ray, Vec3};

/// Direction components at or below this magnitude are treated as parallel
/// to the slab.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// A freshly created box is empty (`min = +inf`, `max = -inf`), so the
/// first call to [`Aabb::expand_to_include`] sets both corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box that contains nothing.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow the box so that it contains `point`.
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grow the box so that it contains both corners of `other`.
    pub fn expand_to_include_box(&mut self, other: &Aabb) {
        self.expand_to_include(other.min);
        self.expand_to_include(other.max);
    }

    /// Returns true until the first point has been included.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive point containment test.
    pub fn contains_point(&self, p: Vec3) -> bool {
        (0..3).all(|k| self.min[k] <= p[k] && p[k] <= self.max[k])
    }

    /// Test if a ray hits this box in front of its origin.
    ///
    /// Uses the slab method. An axis the ray runs parallel to rejects the
    /// ray outright when the origin lies outside that slab. Boxes that
    /// contain the origin always report a hit.
    pub fn intersect(&self, ray: &Ray) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();

        let mut t_min = 0.0_f64;
        let mut t_max = f64::INFINITY;

        for k in 0..3 {
            if direction[k].abs() > PARALLEL_EPSILON {
                let t1 = (self.min[k] - origin[k]) / direction[k];
                let t2 = (self.max[k] - origin[k]) / direction[k];
                t_min = t_min.max(t1.min(t2));
                t_max = t_max.min(t1.max(t2));
            } else if origin[k] < self.min[k] || origin[k] > self.max[k] {
                return false;
            }
        }

        t_max >= t_min && t_max > 0.0
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    ///
    /// Axes are checked in X, Y, Z order with strict comparisons, so on a
    /// tie the later axis wins.
    pub fn longest_axis(&self) -> usize {
        let d = self.extent();

        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
