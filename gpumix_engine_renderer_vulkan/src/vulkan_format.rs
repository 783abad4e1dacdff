/// Conversions between engine enums and their Vulkan counterparts

use ash::vk;
use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::gpumix::render::{DeviceType, Extent2D, TextureFormat};

/// Convert a TextureFormat (texture or vertex attribute) to a Vulkan format
pub fn format_to_vk(format: TextureFormat) -> vk::Format {
    match format {
        TextureFormat::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        TextureFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        TextureFormat::R32G32_SFLOAT => vk::Format::R32G32_SFLOAT,
    }
}

/// Convert a Vulkan format back to a TextureFormat, if the engine knows it
pub fn format_from_vk(format: vk::Format) -> Option<TextureFormat> {
    match format {
        vk::Format::R8G8B8A8_SRGB => Some(TextureFormat::R8G8B8A8_SRGB),
        vk::Format::R8G8B8A8_UNORM => Some(TextureFormat::R8G8B8A8_UNORM),
        vk::Format::B8G8R8A8_SRGB => Some(TextureFormat::B8G8R8A8_SRGB),
        vk::Format::B8G8R8A8_UNORM => Some(TextureFormat::B8G8R8A8_UNORM),
        vk::Format::R32G32_SFLOAT => Some(TextureFormat::R32G32_SFLOAT),
        _ => None,
    }
}

/// Bytes per texel of a color image that can be read back tightly packed
///
/// Only the 8-bit RGBA/BGRA formats qualify; the readback buffer is sized and
/// copied assuming 4 bytes per pixel.
pub fn readback_texel_size(format: vk::Format) -> Result<u32> {
    match format_from_vk(format) {
        Some(known) if known.is_color() && known.bytes_per_pixel() == 4 => Ok(4),
        _ => Err(Error::Unsupported(format!(
            "{:?} is not an 8-bit RGBA/BGRA color format", format
        ))),
    }
}

pub fn device_type_to_vk(device_type: DeviceType) -> vk::PhysicalDeviceType {
    match device_type {
        DeviceType::Other => vk::PhysicalDeviceType::OTHER,
        DeviceType::IntegratedGpu => vk::PhysicalDeviceType::INTEGRATED_GPU,
        DeviceType::DiscreteGpu => vk::PhysicalDeviceType::DISCRETE_GPU,
        DeviceType::VirtualGpu => vk::PhysicalDeviceType::VIRTUAL_GPU,
        DeviceType::Cpu => vk::PhysicalDeviceType::CPU,
    }
}

pub fn extent_to_vk(extent: Extent2D) -> vk::Extent2D {
    vk::Extent2D { width: extent.width, height: extent.height }
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
