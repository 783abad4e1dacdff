//! Unit tests for the fixed pipeline state

use crate::vulkan_pipeline::*;
use ash::vk;

// ============================================================================
// VERTEX INPUT
// ============================================================================

#[test]
fn test_vertex_binding_stride() {
    let bindings = vertex_binding_descriptions();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].binding, 0);
    assert_eq!(bindings[0].stride, 16);
    assert_eq!(bindings[0].input_rate, vk::VertexInputRate::VERTEX);
}

#[test]
fn test_vertex_attributes() {
    let attributes = vertex_attribute_descriptions();
    assert_eq!(attributes[0].location, 0);
    assert_eq!(attributes[0].offset, 0);
    assert_eq!(attributes[0].format, vk::Format::R32G32_SFLOAT);
    assert_eq!(attributes[1].location, 1);
    assert_eq!(attributes[1].offset, 8);
    assert_eq!(attributes[1].format, vk::Format::R32G32_SFLOAT);
    assert!(attributes.iter().all(|a| a.binding == 0));
}

// ============================================================================
// FIXED FUNCTION STATE
// ============================================================================

#[test]
fn test_blend_disabled_writes_all_channels() {
    let blend = color_blend_attachment();
    assert_eq!(blend.blend_enable, vk::FALSE);
    assert_eq!(blend.color_write_mask, vk::ColorComponentFlags::RGBA);
    assert_eq!(blend.src_color_blend_factor, vk::BlendFactor::ONE);
    assert_eq!(blend.dst_color_blend_factor, vk::BlendFactor::ZERO);
    assert_eq!(blend.color_blend_op, vk::BlendOp::ADD);
}

#[test]
fn test_rasterization_state() {
    let raster = rasterization_state();
    assert_eq!(raster.polygon_mode, vk::PolygonMode::FILL);
    assert_eq!(raster.cull_mode, vk::CullModeFlags::BACK);
    assert_eq!(raster.front_face, vk::FrontFace::COUNTER_CLOCKWISE);
    assert_eq!(raster.line_width, 1.0);
}

#[test]
fn test_texture_binding_visible_to_fragment_stage() {
    let binding = texture_layout_binding();
    assert_eq!(binding.binding, TEXTURE_BINDING);
    assert_eq!(binding.descriptor_type, vk::DescriptorType::COMBINED_IMAGE_SAMPLER);
    assert_eq!(binding.descriptor_count, 1);
    assert_eq!(binding.stage_flags, vk::ShaderStageFlags::FRAGMENT);
}

#[test]
fn test_quad_vertex_count() {
    assert_eq!(QUAD_VERTEX_COUNT, 4);
}
