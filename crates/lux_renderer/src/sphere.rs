//! Sphere primitive for ray tracing.

use lux_core::material::Finish;
use lux_math::{Ray, Vec3};

use crate::hittable::{Hittable, HIT_EPSILON};

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    finish: Finish,
}

impl Sphere {
    /// Create a new sphere with the neutral finish.
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            finish: Finish::default(),
        }
    }

    pub fn with_finish(mut self, finish: Finish) -> Self {
        self.finish = finish;
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray) -> f64 {
        let d = ray.direction();
        let oc = ray.origin() - self.center;

        // a t^2 + 2 b t + c = 0
        let a = d.dot(d);
        let b = d.dot(oc);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return f64::INFINITY;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / a;
        let far = (-b + sqrtd) / a;

        if near > HIT_EPSILON {
            near
        } else if far > HIT_EPSILON {
            far
        } else {
            f64::INFINITY
        }
    }

    /// Outward normal. Not re-normalized, so the point must lie on the
    /// surface for the result to be unit length.
    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    fn finish(&self) -> &Finish {
        &self.finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(sphere.hit(&ray), 4.0);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sphere.hit(&ray), f64::INFINITY);

        // Sphere entirely behind the origin
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(sphere.hit(&ray), f64::INFINITY);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(sphere.hit(&ray), 2.0);
    }

    #[test]
    fn test_sphere_normal_matches_hit_point() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec3::new(1.0, -2.0, 0.5);
        let radius = 1.5;
        let sphere = Sphere::new(center, radius);

        let mut hits = 0;
        for _ in 0..500 {
            let origin = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let target = center
                + Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
            let ray = Ray::new(origin, target - origin);

            let t = sphere.hit(&ray);
            if t.is_finite() {
                hits += 1;
                let p = ray.at(t);
                assert_eq!(sphere.normal(p), (p - center) / radius);
            }
        }
        assert!(hits > 0);
    }
}
