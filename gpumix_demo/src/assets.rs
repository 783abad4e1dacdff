/// Texture loading and readback output naming

use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::gpumix::render::{Extent2D, TextureData};
use gpumix_engine::engine_info;
use std::path::Path;

/// Decode an image file into RGBA8 texture data
pub fn load_texture(path: &Path) -> Result<TextureData> {
    let image = image::open(path)
        .map_err(|e| Error::InvalidResource(format!("Failed to open texture '{}': {}", path.display(), e)))?
        .into_rgba8();
    let (width, height) = image.dimensions();
    engine_info!("gpumix::demo", "Loaded texture '{}' ({}x{})", path.display(), width, height);
    TextureData::new(width, height, image.into_raw())
}

/// Black and white checkerboard with square cells of `cell` pixels
pub fn checkerboard(size: u32, cell: u32) -> Result<TextureData> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let value = if (x / cell + y / cell) % 2 == 0 { 255 } else { 0 };
            pixels.extend_from_slice(&[value, value, value, 255]);
        }
    }
    TextureData::new(size, size, pixels)
}

/// Name of the raw readback file: `{texW}x{texH}_{rtW}x{rtH}.rgb`
pub fn readback_file_name(texture: Extent2D, target: Extent2D) -> String {
    format!("{}x{}_{}x{}.rgb", texture.width, texture.height, target.width, target.height)
}

#[cfg(test)]
#[path = "assets_tests.rs"]
mod tests;
