//! Unit tests for the render pass attachment description

use crate::vulkan_render_pass::color_attachment_description;
use ash::vk;

#[test]
fn test_attachment_clears_and_stores() {
    let attachment = color_attachment_description(vk::Format::R8G8B8A8_UNORM);
    assert_eq!(attachment.format, vk::Format::R8G8B8A8_UNORM);
    assert_eq!(attachment.load_op, vk::AttachmentLoadOp::CLEAR);
    assert_eq!(attachment.store_op, vk::AttachmentStoreOp::STORE);
    assert_eq!(attachment.samples, vk::SampleCountFlags::TYPE_1);
}

#[test]
fn test_attachment_layouts_stay_color_attachment() {
    let attachment = color_attachment_description(vk::Format::B8G8R8A8_SRGB);
    assert_eq!(attachment.initial_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
    assert_eq!(attachment.final_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);
}
