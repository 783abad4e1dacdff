//! Unit tests for the fixed sampler configuration

use crate::vulkan_sampler::sampler_create_info;
use ash::vk;

#[test]
fn test_sampler_filters_are_linear() {
    let info = sampler_create_info();
    assert_eq!(info.mag_filter, vk::Filter::LINEAR);
    assert_eq!(info.min_filter, vk::Filter::LINEAR);
    assert_eq!(info.mipmap_mode, vk::SamplerMipmapMode::NEAREST);
}

#[test]
fn test_sampler_clamps_every_axis() {
    let info = sampler_create_info();
    assert_eq!(info.address_mode_u, vk::SamplerAddressMode::CLAMP_TO_EDGE);
    assert_eq!(info.address_mode_v, vk::SamplerAddressMode::CLAMP_TO_EDGE);
    assert_eq!(info.address_mode_w, vk::SamplerAddressMode::CLAMP_TO_EDGE);
}

#[test]
fn test_sampler_has_no_anisotropy_or_bias() {
    let info = sampler_create_info();
    assert_eq!(info.anisotropy_enable, vk::FALSE);
    assert_eq!(info.max_anisotropy, 1.0);
    assert_eq!(info.mip_lod_bias, 0.0);
    assert_eq!(info.compare_enable, vk::FALSE);
    assert_eq!((info.min_lod, info.max_lod), (0.0, 0.0));
    assert_eq!(info.unnormalized_coordinates, vk::FALSE);
}
