//! Camera for ray generation and image output.

use std::path::Path;
use std::time::Instant;

use lux_core::output::{write_image, OutputResult};
use lux_core::{CameraConfig, Projection};
use lux_math::{Ray, Vec3};

use crate::renderer::{self, Frame, RenderConfig};
use crate::Scene;

/// Camera for generating rays into the scene.
///
/// The image plane spans `[left, right] x [bottom, top]` in camera space;
/// pixel `(i, j)` maps to `u = left + (right - left) * i / width` and
/// `v = bottom + (top - bottom) * j / height`, with `j = 0` at the bottom.
#[derive(Clone, Debug)]
pub struct Camera {
    projection: Projection,

    // Camera positioning
    eye: Vec3,
    look_at: Vec3,
    up: Vec3,

    // Accepted hit distances
    near: f64,
    far: f64,

    // Image settings
    width: u32,
    height: u32,

    // Image plane window
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,

    config: RenderConfig,

    // Cached basis (set by update_basis())
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a camera at the origin looking down -Z.
    pub fn new(projection: Projection) -> Self {
        let mut camera = Self {
            projection,
            eye: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            near: 0.0,
            far: f64::INFINITY,
            width: 640,
            height: 480,
            left: -0.5,
            right: 0.5,
            bottom: -0.375,
            top: 0.375,
            config: RenderConfig::default(),
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
        };
        camera.update_basis();
        camera
    }

    pub fn orthographic() -> Self {
        Self::new(Projection::Orthographic)
    }

    pub fn perspective() -> Self {
        Self::new(Projection::Perspective)
    }

    /// Build a camera from a scene description.
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.projection)
            .with_position(config.eye, config.look_at, config.up)
            .with_clip(config.near, config.far)
            .with_resolution(config.width, config.height)
            .with_frustum(config.left, config.right, config.bottom, config.top)
    }

    /// Set camera position.
    pub fn with_position(mut self, eye: Vec3, look_at: Vec3, up: Vec3) -> Self {
        self.eye = eye;
        self.look_at = look_at;
        self.up = up;
        self.update_basis();
        self
    }

    /// Set the range of accepted hit distances.
    pub fn with_clip(mut self, near: f64, far: f64) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the image plane window.
    pub fn with_frustum(mut self, left: f64, right: f64, bottom: f64, top: f64) -> Self {
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
        self
    }

    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    fn update_basis(&mut self) {
        self.w = (self.eye - self.look_at).normalize();
        self.u = self.up.cross(self.w).normalize();
        self.v = self.w.cross(self.u).normalize();
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clip(&self) -> (f64, f64) {
        (self.near, self.far)
    }

    /// Camera basis `(u, v, w)`; `w` points from the scene toward the eye.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate the primary ray for pixel `(i, j)`.
    pub fn ray_for_pixel(&self, i: u32, j: u32) -> Ray {
        let su = self.left + (self.right - self.left) * i as f64 / self.width as f64;
        let sv = self.bottom + (self.top - self.bottom) * j as f64 / self.height as f64;
        let offset = su * self.u + sv * self.v;

        match self.projection {
            Projection::Orthographic => Ray::new(self.eye + offset, -self.w),
            Projection::Perspective => Ray::new(self.eye, offset - self.w),
        }
    }

    /// Render the scene into memory.
    pub fn render_frame(&self, scene: &Scene) -> Frame {
        if scene.is_bvh_stale() {
            log::warn!(
                "BVH does not cover all {} triangles; call build_bvh() after adding shapes",
                scene.triangle_count()
            );
        }

        let start = Instant::now();
        let frame = renderer::render_frame(self, scene, &self.config);
        log::info!(
            "Rendered {}x{} in {:.2?}",
            self.width,
            self.height,
            start.elapsed()
        );
        frame
    }

    /// Render the scene and write it to `path`.
    ///
    /// The file format follows the extension.
    pub fn render(&self, path: impl AsRef<Path>, scene: &Scene) -> OutputResult<()> {
        let path = path.as_ref();
        let frame = self.render_frame(scene);
        write_image(path, frame.width, frame.height, frame.to_rgba(self.config.gamma))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective()
    }
}
