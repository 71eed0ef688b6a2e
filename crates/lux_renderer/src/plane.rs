//! Infinite plane primitive.

use lux_core::material::Finish;
use lux_math::{Ray, Vec3};

use crate::hittable::Hittable;

/// An infinite plane through `point` with unit `normal`.
#[derive(Clone, Debug)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    finish: Finish,
}

impl Plane {
    /// Create a plane. `normal` is expected to be unit length.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            finish: Finish::default(),
        }
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }
}

impl Hittable for Plane {
    /// Signed distance to the plane along the ray.
    ///
    /// Unlike the other shapes this does not reject hits behind the ray
    /// origin; callers discard non-positive results. Rays parallel to the
    /// plane (including rays lying in it) return infinity.
    fn hit(&self, ray: &Ray) -> f64 {
        let denominator = ray.direction().dot(self.normal);
        if denominator == 0.0 {
            return f64::INFINITY;
        }
        (self.point - ray.origin()).dot(self.normal) / denominator
    }

    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn finish(&self) -> &Finish {
        &self.finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground() -> Plane {
        Plane::new(Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(ground().hit(&ray), 5.0);
    }

    #[test]
    fn test_plane_parallel_ray() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ground().hit(&ray), f64::INFINITY);

        // A ray lying in the plane is treated as parallel too
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ground().hit(&ray), f64::INFINITY);
    }

    #[test]
    fn test_plane_behind_origin_is_negative() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert_eq!(ground().hit(&ray), -5.0);
    }

    #[test]
    fn test_plane_normal_is_constant() {
        let plane = ground();
        assert_eq!(plane.normal(Vec3::new(3.0, 0.0, -7.0)), Vec3::Y);
        assert_eq!(plane.normal(Vec3::new(100.0, 42.0, 1.0)), Vec3::Y);
    }
}
