//! Unit tests for the readback copy region

use crate::vulkan_render_target::readback_region;
use ash::vk;

#[test]
fn test_readback_region_covers_whole_image() {
    let region = readback_region(vk::Extent2D { width: 1280, height: 720 });
    assert_eq!(region.buffer_offset, 0);
    assert_eq!(region.buffer_row_length, 1280);
    assert_eq!(region.buffer_image_height, 720);
    assert_eq!(region.image_extent, vk::Extent3D { width: 1280, height: 720, depth: 1 });
    assert_eq!(region.image_offset, vk::Offset3D { x: 0, y: 0, z: 0 });
}

#[test]
fn test_readback_region_color_aspect() {
    let region = readback_region(vk::Extent2D { width: 4, height: 2 });
    assert_eq!(region.image_subresource.aspect_mask, vk::ImageAspectFlags::COLOR);
    assert_eq!(region.image_subresource.mip_level, 0);
    assert_eq!(region.image_subresource.layer_count, 1);
}
