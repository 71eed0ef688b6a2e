//! Hittable trait and the closed set of shapes a scene can hold.

use std::sync::Arc;

use lux_core::material::Finish;
use lux_math::{Ray, Vec3};

use crate::{Plane, Sphere, Triangle, TriangleMesh};

/// Smallest distance accepted as a hit, so rays leaving a surface do not
/// strike it again at their own origin.
pub const HIT_EPSILON: f64 = 1e-7;

/// Trait for objects that can be hit by rays.
pub trait Hittable {
    /// Distance along `ray` to the nearest forward intersection, or
    /// `f64::INFINITY` when there is none.
    fn hit(&self, ray: &Ray) -> f64;

    /// Surface normal at `point`. Only meaningful for points on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Flat Phong terms used when no material overrides them.
    fn finish(&self) -> &Finish;
}

/// Any shape that can be registered with a [`crate::Scene`].
#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Arc<Triangle>),
    TriangleMesh(TriangleMesh),
}

impl Shape {
    pub fn as_triangle(&self) -> Option<&Arc<Triangle>> {
        match self {
            Shape::Triangle(triangle) => Some(triangle),
            _ => None,
        }
    }
}

impl Hittable for Shape {
    fn hit(&self, ray: &Ray) -> f64 {
        match self {
            Shape::Sphere(s) => s.hit(ray),
            Shape::Plane(p) => p.hit(ray),
            Shape::Triangle(t) => t.hit(ray),
            Shape::TriangleMesh(m) => m.hit(ray),
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Sphere(s) => s.normal(point),
            Shape::Plane(p) => p.normal(point),
            Shape::Triangle(t) => t.normal(point),
            Shape::TriangleMesh(m) => m.normal(point),
        }
    }

    fn finish(&self) -> &Finish {
        match self {
            Shape::Sphere(s) => s.finish(),
            Shape::Plane(p) => p.finish(),
            Shape::Triangle(t) => t.finish(),
            Shape::TriangleMesh(m) => m.finish(),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Triangle> for Shape {
    fn from(triangle: Triangle) -> Self {
        Shape::Triangle(Arc::new(triangle))
    }
}

impl From<Arc<Triangle>> for Shape {
    fn from(triangle: Arc<Triangle>) -> Self {
        Shape::Triangle(triangle)
    }
}

impl From<TriangleMesh> for Shape {
    fn from(mesh: TriangleMesh) -> Self {
        Shape::TriangleMesh(mesh)
    }
}

/// The shape a scene query struck.
///
/// BVH hits come back as bare triangles; brute-force hits as the
/// registered shape.
#[derive(Clone, Copy, Debug)]
pub enum Surface<'a> {
    Triangle(&'a Triangle),
    Shape(&'a Shape),
}

impl<'a> Surface<'a> {
    /// The struck triangle, whichever path found it.
    pub fn as_triangle(&self) -> Option<&'a Triangle> {
        match *self {
            Surface::Triangle(triangle) => Some(triangle),
            Surface::Shape(shape) => shape.as_triangle().map(|t| t.as_ref()),
        }
    }
}

impl Hittable for Surface<'_> {
    fn hit(&self, ray: &Ray) -> f64 {
        match self {
            Surface::Triangle(t) => t.hit(ray),
            Surface::Shape(s) => s.hit(ray),
        }
    }

    fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Surface::Triangle(t) => t.normal(point),
            Surface::Shape(s) => s.normal(point),
        }
    }

    fn finish(&self) -> &Finish {
        match self {
            Surface::Triangle(t) => t.finish(),
            Surface::Shape(s) => s.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_dispatch() {
        let shape = Shape::from(Sphere::new(Vec3::ZERO, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        assert_eq!(shape.hit(&ray), 4.0);
        assert_eq!(shape.normal(Vec3::new(0.0, 0.0, 1.0)), Vec3::Z);
        assert!(shape.as_triangle().is_none());
    }

    #[test]
    fn test_surface_finds_triangle_either_way() {
        let triangle = Arc::new(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y));
        let shape = Shape::from(triangle.clone());

        let direct = Surface::Triangle(&triangle);
        let registered = Surface::Shape(&shape);

        assert!(direct.as_triangle().is_some());
        assert!(registered.as_triangle().is_some());
        assert_eq!(direct.normal(Vec3::ZERO), registered.normal(Vec3::ZERO));
    }
}
