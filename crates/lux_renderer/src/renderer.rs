//! Per-pixel ray casting and Phong shading.
//!
//! Every pixel is independent: one primary ray, the nearest hit from the
//! scene, and a local Phong evaluation against the single point light.
//! Columns are rendered in parallel with rayon.

use lux_core::material::Finish;
use lux_core::output::{color_to_rgba, DEFAULT_GAMMA};
use lux_core::RenderSettings;
use lux_math::{Color, Interval, Vec3};
use rayon::prelude::*;

use crate::hittable::{Hittable, Surface};
use crate::{Camera, Scene};

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Display gamma applied when encoding the image
    pub gamma: f64,
    /// Cast a shadow ray from every shaded point
    pub shadows: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            shadows: false,
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            gamma: settings.gamma,
            shadows: settings.shadows,
        }
    }
}

/// A rendered image held in memory.
///
/// Buffers are column-major: pixel `(i, j)` lives at `i * height + j`, and
/// `j = 0` is the bottom row.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Shaded color per pixel, 0-255 channel space, not yet clamped
    colors: Vec<Color>,
    /// Hit distance per pixel, infinity where nothing was accepted
    depth: Vec<f64>,
}

impl Frame {
    #[inline]
    fn index(&self, i: u32, j: u32) -> usize {
        i as usize * self.height as usize + j as usize
    }

    /// Color at column `i`, row `j` (counted from the bottom).
    pub fn get(&self, i: u32, j: u32) -> Color {
        self.colors[self.index(i, j)]
    }

    /// Accepted hit distance at `(i, j)`, or infinity for a background pixel.
    pub fn depth_at(&self, i: u32, j: u32) -> f64 {
        self.depth[self.index(i, j)]
    }

    /// Gamma-encoded RGBA bytes, row-major with the top row first.
    pub fn to_rgba(&self, gamma: f64) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for row in (0..self.height).rev() {
            for column in 0..self.width {
                rgba.extend_from_slice(&color_to_rgba(self.get(column, row), gamma));
            }
        }
        rgba
    }
}

/// Phong color of `surface` at `point`.
///
/// Triangles with a material shade from it (texture-sampled when it has
/// one) and with their smooth normal when they carry vertex normals;
/// everything else uses its flat finish and geometric normal. The normal
/// is flipped to face the viewer.
pub fn shade(
    scene: &Scene,
    surface: Surface<'_>,
    point: Vec3,
    eye: Vec3,
    config: &RenderConfig,
) -> Color {
    let triangle = surface.as_triangle();

    let mut normal = triangle
        .and_then(|t| t.interpolated_normal(point))
        .unwrap_or_else(|| surface.normal(point));

    let finish: Finish = triangle
        .and_then(|t| t.material_finish(point))
        .unwrap_or_else(|| *surface.finish());

    let light = scene.light();
    let to_light = (light - point).normalize();
    let to_eye = (eye - point).normalize();
    let halfway = (to_eye + to_light).normalize();

    if normal.dot(to_eye) < 0.0 {
        normal = -normal;
    }

    if config.shadows && scene.occluded(point, light) {
        return finish.ambient;
    }

    let diffuse = normal.dot(to_light).max(0.0);
    let specular = normal.dot(halfway).max(0.0).powf(finish.shininess);

    finish.ambient + finish.diffuse * diffuse + finish.specular * specular
}

/// Cast one ray per pixel and shade the accepted hits.
pub(crate) fn render_frame(camera: &Camera, scene: &Scene, config: &RenderConfig) -> Frame {
    let (width, height) = camera.resolution();
    let column_len = height as usize;
    let pixels = width as usize * column_len;

    let mut colors = vec![Color::ZERO; pixels];
    let mut depth = vec![f64::INFINITY; pixels];
    if pixels == 0 {
        return Frame {
            width,
            height,
            colors,
            depth,
        };
    }

    let (near, far) = camera.clip();
    let clip = Interval::new(near, far);
    let eye = camera.eye();

    colors
        .par_chunks_mut(column_len)
        .zip(depth.par_chunks_mut(column_len))
        .enumerate()
        .for_each(|(i, (color_column, depth_column))| {
            for j in 0..column_len {
                let ray = camera.ray_for_pixel(i as u32, j as u32);
                let (surface, t) = scene.intersect(&ray);

                let Some(surface) = surface else { continue };
                if !t.is_finite() || !clip.contains(t) {
                    continue;
                }

                color_column[j] = shade(scene, surface, ray.at(t), eye, config);
                depth_column[j] = t;
            }
        });

    Frame {
        width,
        height,
        colors,
        depth,
    }
}
