//! lux Renderer - CPU ray casting.
//!
//! One ray per pixel, nearest hit through a BVH over triangles plus a
//! brute-force list for everything else, and local Phong shading from a
//! single point light.

mod bvh;
mod camera;
mod hittable;
mod plane;
mod renderer;
mod scene;
mod setup;
mod sphere;
mod triangle;
mod triangle_mesh;

pub use bvh::{Bvh, BvhNode, BvhStats};
pub use camera::Camera;
pub use hittable::{Hittable, Shape, Surface, HIT_EPSILON};
pub use plane::Plane;
pub use renderer::{shade, Frame, RenderConfig};
pub use scene::Scene;
pub use setup::build_scene;
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use triangle_mesh::TriangleMesh;

/// Re-export common math and asset types
pub use lux_core::material::Finish;
pub use lux_core::Material;
pub use lux_math::{Aabb, Color, Ray, Vec2, Vec3};
