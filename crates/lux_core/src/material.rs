//! Phong material definitions, as read from MTL files.

use std::sync::Arc;

use lux_math::{Color, Vec3};
use serde::Deserialize;

use crate::texture::Texture;

/// Flat Phong terms carried by every shape, in 0-255 channel space.
///
/// The default is the neutral grey used for surfaces without a material.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Finish {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f64,
}

impl Finish {
    /// The neutral finish.
    pub const NEUTRAL: Finish = Finish {
        ambient: Vec3::splat(10.0),
        diffuse: Vec3::splat(128.0),
        specular: Vec3::splat(255.0),
        shininess: 50.0,
    };
}

impl Default for Finish {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// A Phong material.
///
/// Colors are stored in unit range and returned in 0-255 channel space by
/// the accessors. Materials are shared between triangles through `Arc` and
/// are never mutated once the scene is assembled.
#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (from the `newmtl` statement)
    pub name: String,

    /// Ambient color (RGB, 0-1)
    pub ambient: Vec3,

    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse: Vec3,

    /// Specular color (RGB, 0-1)
    pub specular: Vec3,

    /// Specular exponent
    pub shininess: f64,

    /// Diffuse texture, present only if it loaded successfully
    pub texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::splat(0.5), // Grey default
            specular: Vec3::ZERO,
            shininess: 0.0,
            texture: None,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse,
            ..Default::default()
        }
    }

    /// Attach a diffuse texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Ambient color in 0-255 space.
    pub fn ambient_color(&self) -> Color {
        self.ambient * 255.0
    }

    /// Diffuse color in 0-255 space.
    pub fn diffuse_color(&self) -> Color {
        self.diffuse * 255.0
    }

    /// Specular color in 0-255 space.
    pub fn specular_color(&self) -> Color {
        self.specular * 255.0
    }

    /// True when a texture is attached. A texture that failed to load is
    /// never attached, so this also means "loaded".
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Sample the diffuse texture, if any, in 0-255 space.
    pub fn sample_texture(&self, u: f64, v: f64) -> Option<Color> {
        self.texture.as_ref().map(|texture| texture.sample(u, v))
    }

    /// Phong terms at a surface point with texture coordinates `(u, v)`.
    ///
    /// A texture replaces the diffuse color and tints the ambient color;
    /// the specular terms always come from the material.
    pub fn finish_at(&self, u: f64, v: f64) -> Finish {
        let (ambient, diffuse) = match self.sample_texture(u, v) {
            Some(texel) => (self.ambient * texel, texel),
            None => (self.ambient_color(), self.diffuse_color()),
        };

        Finish {
            ambient,
            diffuse,
            specular: self.specular_color(),
            shininess: self.shininess,
        }
    }
}

impl From<&tobj::Material> for Material {
    fn from(mtl: &tobj::Material) -> Self {
        let rgb = |c: Option<[f32; 3]>, fallback: Vec3| {
            c.map(|[r, g, b]| Vec3::new(r as f64, g as f64, b as f64))
                .unwrap_or(fallback)
        };
        let defaults = Material::default();

        Self {
            name: mtl.name.clone(),
            ambient: rgb(mtl.ambient, defaults.ambient),
            diffuse: rgb(mtl.diffuse, defaults.diffuse),
            specular: rgb(mtl.specular, defaults.specular),
            shininess: mtl.shininess.map(f64::from).unwrap_or(defaults.shininess),
            texture: None,
        }
    }
}
