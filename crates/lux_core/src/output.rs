//! Gamma encoding and image file output.

use std::path::Path;

use lux_math::Color;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Default display gamma.
pub const DEFAULT_GAMMA: f64 = 2.2;

/// Gamma-encode one channel given in 0-255 space.
///
/// The channel is clamped to [0, 255] first; the result is
/// `255 * (c / 255)^(1 / gamma)`, truncated to a byte.
#[inline]
pub fn encode_gamma(channel: f64, gamma: f64) -> u8 {
    let c = channel.clamp(0.0, 255.0);
    (255.0 * (c / 255.0).powf(1.0 / gamma)) as u8
}

/// Convert a 0-255 color to gamma-encoded, opaque RGBA bytes.
pub fn color_to_rgba(color: Color, gamma: f64) -> [u8; 4] {
    [
        encode_gamma(color.x, gamma),
        encode_gamma(color.y, gamma),
        encode_gamma(color.z, gamma),
        255,
    ]
}

/// Write a row-major, top-row-first RGBA byte grid to `path`.
///
/// The file format follows the extension (PNG, JPEG, BMP, ...).
pub fn write_image(path: impl AsRef<Path>, width: u32, height: u32, rgba: Vec<u8>) -> OutputResult<()> {
    let path = path.as_ref();
    let expected = width as usize * height as usize * 4;
    let actual = rgba.len();

    let img = image::RgbaImage::from_raw(width, height, rgba).ok_or(OutputError::BufferSize {
        width,
        height,
        expected,
        actual,
    })?;

    img.save(path).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}
