//! JSON scene description.
//!
//! A scene file names the camera, the point light, render settings and a
//! list of shapes. Relative mesh paths are resolved against the directory
//! of the scene file when it is loaded from disk.
//!
//! ```json
//! {
//!   "camera": {
//!     "projection": "perspective",
//!     "eye": [0, 1, 5], "look_at": [0, 0, 0],
//!     "width": 640, "height": 480,
//!     "left": -0.5, "right": 0.5, "bottom": -0.375, "top": 0.375
//!   },
//!   "light": [5, 5, 5],
//!   "shapes": [
//!     { "type": "sphere", "center": [0, 0, 0], "radius": 1 },
//!     { "type": "mesh", "path": "bunny.obj" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use lux_math::{Vec2, Vec3};
use serde::Deserialize;
use thiserror::Error;

use crate::material::Finish;
use crate::output::DEFAULT_GAMMA;

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scene description: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Camera projection model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera placement, clip window, resolution and frustum.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub projection: Projection,
    pub eye: Vec3,
    pub look_at: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    #[serde(default)]
    pub near: f64,
    #[serde(default = "default_far")]
    pub far: f64,
    pub width: u32,
    pub height: u32,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

/// Settings that affect the final image but not the geometry.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Display gamma applied when encoding
    pub gamma: f64,
    /// Enable the shadow-ray test for the point light
    pub shadows: bool,
    /// Output image path
    pub output: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            shadows: false,
            output: PathBuf::from("render.png"),
        }
    }
}

/// One entry of the scene's shape list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    Sphere {
        center: Vec3,
        radius: f64,
        #[serde(default)]
        finish: Finish,
    },
    Plane {
        point: Vec3,
        normal: Vec3,
        #[serde(default)]
        finish: Finish,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        uvs: Option<[Vec2; 3]>,
        #[serde(default)]
        normals: Option<[Vec3; 3]>,
        #[serde(default)]
        finish: Finish,
    },
    /// An OBJ file. With `as_triangles` every face is registered on its
    /// own (and goes through the BVH); otherwise the whole mesh is one
    /// brute-force shape.
    Mesh {
        path: PathBuf,
        #[serde(default = "default_true")]
        as_triangles: bool,
        #[serde(default)]
        finish: Finish,
    },
}

/// A complete scene description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    /// Position of the single point light
    pub light: Vec3,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub shapes: Vec<ShapeConfig>,
}

impl SceneConfig {
    /// Read and validate a scene file, resolving relative mesh paths.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }

        log::debug!(
            "Loaded scene {}: {} shape entries",
            path.display(),
            config.shapes.len()
        );
        Ok(config)
    }

    /// Parse and validate a scene description from a JSON string.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "camera resolution {}x{} has no pixels",
                self.camera.width, self.camera.height
            )));
        }
        if self.render.gamma <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "gamma must be positive, got {}",
                self.render.gamma
            )));
        }
        Ok(())
    }

    /// Make relative mesh paths relative to `base`. The output path is left
    /// relative to the working directory.
    pub fn resolve_paths(&mut self, base: &Path) {
        for shape in &mut self.shapes {
            if let ShapeConfig::Mesh { path, .. } = shape {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_far() -> f64 {
    f64::INFINITY
}

fn default_true() -> bool {
    true
}
