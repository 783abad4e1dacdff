/// Fixed sampler used for the quad texture
///
/// Linear filtering, clamp-to-edge on every axis, no anisotropy, no mip bias.

use ash::vk;
use gpumix_engine::gpumix::{Error, Result};
use gpumix_engine::engine_error;

/// Create info for the one sampler configuration the renderer uses
pub fn sampler_create_info() -> vk::SamplerCreateInfo<'static> {
    vk::SamplerCreateInfo::default()
        .mag_filter(vk::Filter::LINEAR)
        .min_filter(vk::Filter::LINEAR)
        .mipmap_mode(vk::SamplerMipmapMode::NEAREST)
        .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_EDGE)
        .address_mode_v(vk::SamplerAddressMode::CLAMP_TO_EDGE)
        .address_mode_w(vk::SamplerAddressMode::CLAMP_TO_EDGE)
        .mip_lod_bias(0.0)
        .anisotropy_enable(false)
        .max_anisotropy(1.0)
        .compare_enable(false)
        .compare_op(vk::CompareOp::ALWAYS)
        .min_lod(0.0)
        .max_lod(0.0)
        .border_color(vk::BorderColor::FLOAT_TRANSPARENT_BLACK)
        .unnormalized_coordinates(false)
}

pub(crate) fn create_sampler(device: &ash::Device) -> Result<vk::Sampler> {
    unsafe { device.create_sampler(&sampler_create_info(), None) }
        .map_err(|e| {
            engine_error!("gpumix::vulkan", "Failed to create sampler: {:?}", e);
            Error::InitializationFailed(format!("Failed to create sampler: {:?}", e))
        })
}

#[cfg(test)]
#[path = "vulkan_sampler_tests.rs"]
mod tests;
