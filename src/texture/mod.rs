use std::path::Path;

use crate::error::TextureError;

pub mod sprite;

/// A decoded RGBA image held as packed `0xAARRGGBB` pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Texture {
    /// Wraps packed ARGB pixels, checking that they fill `width × height`.
    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Decodes an image file with the `image` crate.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let name = path.display().to_string();
        let decoded = image::open(path)
            .map_err(|source| TextureError::LoadFailed { name, source })?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = pixel.0;
                u32::from_be_bytes([a, r, g, b])
            })
            .collect();
        Self::from_argb(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour lookup at normalised coordinates. Out-of-range inputs clamp to the edge.
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = ((v * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}
