//! Texture loading and caching for materials.
//!
//! Textures are decoded once with the `image` crate and shared between
//! materials through `Arc`, so the render loop only ever reads them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lux_math::{Color, Interval, Vec3};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear, 0-1 range)
    /// Stored as [R, G, B, A] per pixel, row-major order, top row first
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1) from a 0-1 color.
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x as f32, color.y as f32, color.z as f32, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// `u` and `v` are clamped to [0, 1]; `v = 0` is the bottom image row.
    /// The result is in 0-255 channel space. A texture without pixels
    /// samples as black.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::ZERO;
        }

        let u = Interval::UNIT.clamp(u);
        let v = Interval::UNIT.clamp(v);

        // Convert to pixel coordinates
        let x = u * (self.width as f64 - 1.0);
        let y = (1.0 - v) * (self.height as f64 - 1.0); // Flip V for image coordinates

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = self.get_pixel(x0, y0);
        let p10 = self.get_pixel(x1, y0);
        let p01 = self.get_pixel(x0, y1);
        let p11 = self.get_pixel(x1, y1);

        let top = p00 * (1.0 - fx) + p10 * fx;
        let bottom = p01 * (1.0 - fx) + p11 * fx;

        (top * (1.0 - fy) + bottom * fy) * 255.0
    }

    /// Get pixel at integer coordinates as an RGB vector.
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        let [r, g, b, _] = self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0, 1.0]);
        Vec3::new(r as f64, g as f64, b as f64)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Cache for loaded textures.
///
/// Materials that name the same image file share one `Arc<Texture>`.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);

        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let display = path.to_string_lossy().to_string();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: display.clone(),
        source,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty(display));
    }

    // Convert to linear float RGBA
    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                srgb_to_linear(p[0]),
                srgb_to_linear(p[1]),
                srgb_to_linear(p[2]),
                p[3] as f32 / 255.0, // Alpha is linear
            ]
        })
        .collect();

    Ok(Texture::new(width, height, pixels, display))
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: top row red, green; bottom row blue, white
        Texture::new(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
            "<checker>",
        )
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        let sample = tex.sample(0.5, 0.5);
        assert!((sample.x - 255.0).abs() < 0.001);
        assert!((sample.y - 127.5).abs() < 0.001);
        assert!(sample.z.abs() < 0.001);
    }

    #[test]
    fn test_sample_flips_v() {
        let tex = checker();
        // v = 0 is the bottom row, which starts with blue
        assert_eq!(tex.sample(0.0, 0.0), Vec3::new(0.0, 0.0, 255.0));
        // v = 1 is the top row, which starts with red
        assert_eq!(tex.sample(0.0, 1.0), Vec3::new(255.0, 0.0, 0.0));
        assert_eq!(tex.sample(1.0, 1.0), Vec3::new(0.0, 255.0, 0.0));
    }

    #[test]
    fn test_sample_clamps_out_of_range_uv() {
        let tex = checker();
        assert_eq!(tex.sample(-3.0, 7.0), tex.sample(0.0, 1.0));
        assert_eq!(tex.sample(2.0, -1.0), tex.sample(1.0, 0.0));
    }

    #[test]
    fn test_sample_bilinear_center() {
        let tex = checker();
        let center = tex.sample(0.5, 0.5);
        // Average of the four texels
        assert!((center - Vec3::new(127.5, 127.5, 127.5)).length() < 1e-9);
    }

    #[test]
    fn test_sample_empty_texture_is_black() {
        let tex = Texture::new(0, 0, Vec::new(), "<empty>");
        assert_eq!(tex.sample(0.5, 0.5), Vec3::ZERO);

        let tex = Texture::new(3, 0, Vec::new(), "<no rows>");
        assert_eq!(tex.sample(1.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_texture_cache() {
        let cache = TextureCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_texture_cache_missing_file() {
        let mut cache = TextureCache::with_base_dir(std::env::temp_dir());
        let result = cache.load("lux_definitely_missing_texture.png");
        assert!(matches!(result, Err(TextureError::Load { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
