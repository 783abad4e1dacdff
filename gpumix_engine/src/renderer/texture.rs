/// Texture formats and CPU-side texture data

use crate::error::{Error, Result};

/// Texture and vertex attribute format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // Texture formats
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,

    // Vertex attribute formats
    R32G32_SFLOAT,
}

impl TextureFormat {
    /// Size of one texel (or one attribute) in bytes
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM => 4,
            TextureFormat::R32G32_SFLOAT => 8,
        }
    }

    /// True for formats that can back an image (as opposed to vertex attributes)
    pub fn is_color(self) -> bool {
        !matches!(self, TextureFormat::R32G32_SFLOAT)
    }
}

// ===== TEXTURE DATA =====

/// Decoded RGBA8 pixels ready for upload
///
/// Rows are tightly packed: row pitch is `width * 4`, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureData {
    /// Wrap decoded pixels, checking that the buffer matches the dimensions
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (non-zero)
    /// * `height` - Height in pixels (non-zero)
    /// * `pixels` - Row-major RGBA8 bytes, exactly `width * height * 4` long
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture dimensions must be non-zero, got {}x{}", width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(Error::InvalidResource(format!(
                "Texture {}x{} needs {} bytes of RGBA8 data, got {}",
                width, height, expected, pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Single-color texture, handy for tests and fallbacks
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Size of the pixel payload in bytes
    pub fn byte_len(&self) -> u64 {
        self.pixels.len() as u64
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
