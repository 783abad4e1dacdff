//! Unit tests for Vulkan format conversion functions
//!
//! Tests pure conversion functions without requiring GPU.

use crate::vulkan_format::*;
use ash::vk;
use gpumix_engine::gpumix::Error;
use gpumix_engine::gpumix::render::{DeviceType, Extent2D, TextureFormat};

// ============================================================================
// TEXTURE FORMAT CONVERSION TESTS
// ============================================================================

#[test]
fn test_texture_format_to_vk_color_formats() {
    assert_eq!(format_to_vk(TextureFormat::R8G8B8A8_SRGB), vk::Format::R8G8B8A8_SRGB);
    assert_eq!(format_to_vk(TextureFormat::R8G8B8A8_UNORM), vk::Format::R8G8B8A8_UNORM);
    assert_eq!(format_to_vk(TextureFormat::B8G8R8A8_SRGB), vk::Format::B8G8R8A8_SRGB);
    assert_eq!(format_to_vk(TextureFormat::B8G8R8A8_UNORM), vk::Format::B8G8R8A8_UNORM);
}

#[test]
fn test_vertex_format_to_vk() {
    assert_eq!(format_to_vk(TextureFormat::R32G32_SFLOAT), vk::Format::R32G32_SFLOAT);
}

#[test]
fn test_format_from_vk_inverts_mapping() {
    for format in [
        TextureFormat::R8G8B8A8_SRGB,
        TextureFormat::R8G8B8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM,
        TextureFormat::R32G32_SFLOAT,
    ] {
        assert_eq!(format_from_vk(format_to_vk(format)), Some(format));
    }
}

#[test]
fn test_format_from_vk_unknown() {
    assert_eq!(format_from_vk(vk::Format::D32_SFLOAT), None);
    assert_eq!(format_from_vk(vk::Format::UNDEFINED), None);
}

// ============================================================================
// DEVICE TYPE AND EXTENT CONVERSION TESTS
// ============================================================================

#[test]
fn test_device_type_mapping() {
    assert_eq!(device_type_to_vk(DeviceType::IntegratedGpu), vk::PhysicalDeviceType::INTEGRATED_GPU);
    assert_eq!(device_type_to_vk(DeviceType::DiscreteGpu), vk::PhysicalDeviceType::DISCRETE_GPU);
    assert_eq!(device_type_to_vk(DeviceType::Cpu), vk::PhysicalDeviceType::CPU);
    assert_eq!(device_type_to_vk(DeviceType::Other), vk::PhysicalDeviceType::OTHER);
}

#[test]
fn test_extent_conversion() {
    let vk_extent = extent_to_vk(Extent2D::new(1280, 720));
    assert_eq!((vk_extent.width, vk_extent.height), (1280, 720));
}

// ============================================================================
// READBACK TEXEL SIZE
// ============================================================================

#[test]
fn test_readback_texel_size_rgba8_formats() {
    for format in [
        vk::Format::R8G8B8A8_SRGB,
        vk::Format::R8G8B8A8_UNORM,
        vk::Format::B8G8R8A8_SRGB,
        vk::Format::B8G8R8A8_UNORM,
    ] {
        assert_eq!(readback_texel_size(format).unwrap(), 4);
    }
}

#[test]
fn test_readback_texel_size_rejects_vertex_format() {
    assert!(matches!(readback_texel_size(vk::Format::R32G32_SFLOAT), Err(Error::Unsupported(_))));
}

#[test]
fn test_readback_texel_size_rejects_wide_surface_format() {
    // A surface may list a 16-bit float format first
    assert!(matches!(readback_texel_size(vk::Format::R16G16B16A16_SFLOAT), Err(Error::Unsupported(_))));
    assert!(readback_texel_size(vk::Format::A2B10G10R10_UNORM_PACK32).is_err());
}
