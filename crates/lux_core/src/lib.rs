//! lux Core - assets, scene description and image output.
//!
//! This crate provides everything the renderer consumes or produces that is
//! not ray math:
//!
//! - **Materials and textures**: `Material`, `Texture`, `TextureCache`
//! - **Meshes**: `Mesh`, plus OBJ/MTL loading via `obj::load_obj`
//! - **Scene description**: JSON config types in `config`
//! - **Output**: gamma encoding and image writing in `output`
//!
//! # Example
//!
//! ```ignore
//! use lux_core::obj::load_obj;
//!
//! let meshes = load_obj("assets/bunny.obj")?;
//! let triangles: usize = meshes.iter().map(|m| m.triangle_count()).sum();
//! println!("Loaded {} meshes, {} triangles", meshes.len(), triangles);
//! ```

pub mod config;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod output;
pub mod texture;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError, Projection, RenderSettings, SceneConfig};
pub use material::Material;
pub use mesh::Mesh;
pub use obj::{load_obj, ObjError};
pub use output::{encode_gamma, write_image, OutputError};
pub use texture::{Texture, TextureCache, TextureError};
