//! Unit tests for the pure selection helpers

use crate::vulkan_select::*;
use ash::vk;
use gpumix_engine::gpumix::render::Extent2D;

// ============================================================================
// HELPERS
// ============================================================================

fn caps(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: min,
        max_image_count: max,
        current_extent: vk::Extent2D { width: 800, height: 600 },
        min_image_extent: vk::Extent2D { width: 1, height: 1 },
        max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
        supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT | vk::ImageUsageFlags::TRANSFER_DST,
        supported_transforms: vk::SurfaceTransformFlagsKHR::IDENTITY,
        current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
        ..Default::default()
    }
}

fn memory_properties(types: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
    let mut props = vk::PhysicalDeviceMemoryProperties::default();
    props.memory_type_count = types.len() as u32;
    for (i, flags) in types.iter().enumerate() {
        props.memory_types[i].property_flags = *flags;
    }
    props
}

fn family(flags: vk::QueueFlags, count: u32) -> vk::QueueFamilyProperties {
    vk::QueueFamilyProperties { queue_flags: flags, queue_count: count, ..Default::default() }
}

fn candidate(device_type: vk::PhysicalDeviceType) -> DeviceCandidate {
    DeviceCandidate {
        device_type,
        extensions_supported: true,
        graphics_family: Some(0),
        present_family: Some(0),
        has_surface_formats: true,
        has_present_modes: true,
    }
}

// ============================================================================
// SURFACE FORMAT
// ============================================================================

#[test]
fn test_surface_format_undefined_sentinel() {
    let formats = [vk::SurfaceFormatKHR {
        format: vk::Format::UNDEFINED,
        color_space: vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT,
    }];
    let chosen = choose_surface_format(&formats).unwrap();
    assert_eq!(chosen.format, vk::Format::B8G8R8A8_UNORM);
    assert_eq!(chosen.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR);
}

#[test]
fn test_surface_format_prefers_bgra_unorm() {
    let formats = [
        vk::SurfaceFormatKHR { format: vk::Format::R8G8B8A8_SRGB, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR },
        vk::SurfaceFormatKHR { format: vk::Format::B8G8R8A8_UNORM, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR },
    ];
    assert_eq!(choose_surface_format(&formats).unwrap().format, vk::Format::B8G8R8A8_UNORM);
}

#[test]
fn test_surface_format_falls_back_to_first() {
    let formats = [
        vk::SurfaceFormatKHR { format: vk::Format::R8G8B8A8_SRGB, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR },
        vk::SurfaceFormatKHR { format: vk::Format::A2B10G10R10_UNORM_PACK32, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR },
    ];
    assert_eq!(choose_surface_format(&formats).unwrap().format, vk::Format::R8G8B8A8_SRGB);
}

#[test]
fn test_surface_format_empty() {
    assert!(choose_surface_format(&[]).is_none());
}

// ============================================================================
// PRESENT MODE
// ============================================================================

#[test]
fn test_present_mode_fifo_only_returns_immediate() {
    assert_eq!(choose_present_mode(&[vk::PresentModeKHR::FIFO]), vk::PresentModeKHR::IMMEDIATE);
}

#[test]
fn test_present_mode_mailbox_wins() {
    assert_eq!(
        choose_present_mode(&[vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO]),
        vk::PresentModeKHR::MAILBOX
    );
}

// ============================================================================
// EXTENT
// ============================================================================

#[test]
fn test_extent_uses_current_when_defined() {
    let c = caps(2, 3);
    assert_eq!(choose_swap_extent(&c, Extent2D::new(640, 480)), vk::Extent2D { width: 800, height: 600 });
}

#[test]
fn test_extent_clamps_default_up_to_min() {
    let mut c = caps(2, 3);
    c.current_extent = vk::Extent2D { width: u32::MAX, height: u32::MAX };
    c.min_image_extent = vk::Extent2D { width: 100, height: 100 };
    c.max_image_extent = vk::Extent2D { width: 300, height: 300 };
    assert_eq!(choose_swap_extent(&c, Extent2D::new(50, 60)), vk::Extent2D { width: 100, height: 100 });
}

#[test]
fn test_extent_clamps_default_down_to_max() {
    let mut c = caps(2, 3);
    c.current_extent = vk::Extent2D { width: u32::MAX, height: u32::MAX };
    c.min_image_extent = vk::Extent2D { width: 100, height: 100 };
    c.max_image_extent = vk::Extent2D { width: 300, height: 300 };
    assert_eq!(choose_swap_extent(&c, Extent2D::new(640, 480)), vk::Extent2D { width: 300, height: 300 });
}

// ============================================================================
// USAGE, TRANSFORM, IMAGE COUNT
// ============================================================================

#[test]
fn test_image_usage_requires_transfer_dst() {
    let mut c = caps(2, 3);
    assert!(choose_image_usage(&c).is_some());
    c.supported_usage_flags = vk::ImageUsageFlags::COLOR_ATTACHMENT;
    assert!(choose_image_usage(&c).is_none());
}

#[test]
fn test_pre_transform_falls_back_to_current() {
    let mut c = caps(2, 3);
    assert_eq!(choose_pre_transform(&c), vk::SurfaceTransformFlagsKHR::IDENTITY);
    c.supported_transforms = vk::SurfaceTransformFlagsKHR::ROTATE_90;
    c.current_transform = vk::SurfaceTransformFlagsKHR::ROTATE_90;
    assert_eq!(choose_pre_transform(&c), vk::SurfaceTransformFlagsKHR::ROTATE_90);
}

#[test]
fn test_image_count_min_plus_one() {
    assert_eq!(choose_image_count(&caps(2, 8)), 3);
}

#[test]
fn test_image_count_clamped_to_max() {
    assert_eq!(choose_image_count(&caps(3, 3)), 3);
}

#[test]
fn test_image_count_unbounded_max() {
    assert_eq!(choose_image_count(&caps(4, 0)), 5);
}

// ============================================================================
// QUEUE FAMILIES AND EXTENSIONS
// ============================================================================

#[test]
fn test_find_queue_family_skips_empty_families() {
    let families = [
        family(vk::QueueFlags::GRAPHICS, 0),
        family(vk::QueueFlags::TRANSFER, 1),
        family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE, 2),
    ];
    assert_eq!(find_queue_family(&families, vk::QueueFlags::GRAPHICS), Some(2));
}

#[test]
fn test_find_queue_family_index_zero_is_found() {
    let families = [family(vk::QueueFlags::GRAPHICS, 1)];
    assert_eq!(find_queue_family(&families, vk::QueueFlags::GRAPHICS), Some(0));
    assert_eq!(find_queue_family(&families, vk::QueueFlags::COMPUTE), None);
}

#[test]
fn test_missing_extensions() {
    let available = [ash::khr::swapchain::NAME];
    let required = [ash::khr::swapchain::NAME, c"VK_KHR_fake_extension"];
    assert_eq!(missing_extensions(&available, &required), vec![c"VK_KHR_fake_extension"]);
    assert!(missing_extensions(&available, &required[..1]).is_empty());
}

// ============================================================================
// MEMORY TYPES
// ============================================================================

#[test]
fn test_memory_type_respects_type_bits() {
    let props = memory_properties(&[
        vk::MemoryPropertyFlags::DEVICE_LOCAL,
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        vk::MemoryPropertyFlags::DEVICE_LOCAL | vk::MemoryPropertyFlags::HOST_VISIBLE,
    ]);
    assert_eq!(find_memory_type_index(&props, 0b111, vk::MemoryPropertyFlags::HOST_VISIBLE), Some(1));
    assert_eq!(find_memory_type_index(&props, 0b100, vk::MemoryPropertyFlags::HOST_VISIBLE), Some(2));
}

#[test]
fn test_memory_type_never_picks_incompatible() {
    let props = memory_properties(&[
        vk::MemoryPropertyFlags::DEVICE_LOCAL,
        vk::MemoryPropertyFlags::HOST_VISIBLE,
    ]);
    assert_eq!(find_memory_type_index(&props, 0b01, vk::MemoryPropertyFlags::HOST_VISIBLE), None);
    assert_eq!(find_memory_type_index(&props, 0b11, vk::MemoryPropertyFlags::LAZILY_ALLOCATED), None);
}

#[test]
fn test_memory_type_ignores_entries_past_count() {
    let mut props = memory_properties(&[vk::MemoryPropertyFlags::DEVICE_LOCAL]);
    props.memory_types[1].property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE;
    assert_eq!(find_memory_type_index(&props, 0b11, vk::MemoryPropertyFlags::HOST_VISIBLE), None);
}

#[test]
fn test_best_flags_both() {
    let props = memory_properties(&[
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_CACHED,
    ]);
    assert_eq!(
        best_memory_property_flags(vk::MemoryPropertyFlags::HOST_VISIBLE, vk::MemoryPropertyFlags::HOST_CACHED, &props),
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_CACHED
    );
}

#[test]
fn test_best_flags_must_only() {
    let props = memory_properties(&[
        vk::MemoryPropertyFlags::HOST_VISIBLE,
        vk::MemoryPropertyFlags::HOST_CACHED,
    ]);
    assert_eq!(
        best_memory_property_flags(vk::MemoryPropertyFlags::HOST_VISIBLE, vk::MemoryPropertyFlags::HOST_CACHED, &props),
        vk::MemoryPropertyFlags::HOST_VISIBLE
    );
}

#[test]
fn test_best_flags_none() {
    let props = memory_properties(&[vk::MemoryPropertyFlags::DEVICE_LOCAL]);
    assert!(best_memory_property_flags(
        vk::MemoryPropertyFlags::HOST_VISIBLE,
        vk::MemoryPropertyFlags::HOST_CACHED,
        &props
    ).is_empty());
}

// ============================================================================
// PHYSICAL DEVICE SELECTION
// ============================================================================

#[test]
fn test_select_prefers_type_match() {
    let candidates = vec![
        candidate(vk::PhysicalDeviceType::DISCRETE_GPU),
        candidate(vk::PhysicalDeviceType::INTEGRATED_GPU),
    ];
    let (index, _) = select_physical_device(
        candidates,
        QueueRequirement::GraphicsOnly,
        vk::PhysicalDeviceType::INTEGRATED_GPU,
    ).unwrap();
    assert_eq!(index, 1);
}

#[test]
fn test_select_falls_back_to_first_qualifying() {
    let mut rejected = candidate(vk::PhysicalDeviceType::CPU);
    rejected.graphics_family = None;
    let candidates = vec![
        rejected,
        candidate(vk::PhysicalDeviceType::DISCRETE_GPU),
        candidate(vk::PhysicalDeviceType::VIRTUAL_GPU),
    ];
    let (index, families) = select_physical_device(
        candidates,
        QueueRequirement::GraphicsOnly,
        vk::PhysicalDeviceType::INTEGRATED_GPU,
    ).unwrap();
    assert_eq!(index, 1);
    assert_eq!(families.present, None);
}

#[test]
fn test_select_stops_early_on_type_match() {
    let mut pulled = 0;
    let candidates = (0..5).map(|_| {
        pulled += 1;
        candidate(vk::PhysicalDeviceType::INTEGRATED_GPU)
    });
    let result = select_physical_device(
        candidates,
        QueueRequirement::GraphicsOnly,
        vk::PhysicalDeviceType::INTEGRATED_GPU,
    );
    assert_eq!(result.map(|(i, _)| i), Some(0));
    assert_eq!(pulled, 1);
}

#[test]
fn test_select_onscreen_requires_present_and_surface_support() {
    let mut no_modes = candidate(vk::PhysicalDeviceType::INTEGRATED_GPU);
    no_modes.has_present_modes = false;
    let mut no_present = candidate(vk::PhysicalDeviceType::INTEGRATED_GPU);
    no_present.present_family = None;
    let mut good = candidate(vk::PhysicalDeviceType::DISCRETE_GPU);
    good.present_family = Some(2);

    let (index, families) = select_physical_device(
        vec![no_modes.clone(), no_present.clone(), good],
        QueueRequirement::GraphicsAndPresent,
        vk::PhysicalDeviceType::INTEGRATED_GPU,
    ).unwrap();
    assert_eq!(index, 2);
    assert_eq!(families, QueueFamilies { graphics: 0, present: Some(2) });

    // Offscreen does not care about presentation
    assert!(no_present.qualifies(QueueRequirement::GraphicsOnly).is_some());
}

#[test]
fn test_select_rejects_missing_extensions() {
    let mut c = candidate(vk::PhysicalDeviceType::INTEGRATED_GPU);
    c.extensions_supported = false;
    assert!(select_physical_device(
        vec![c],
        QueueRequirement::GraphicsOnly,
        vk::PhysicalDeviceType::INTEGRATED_GPU
    ).is_none());
}

#[test]
fn test_unique_families() {
    assert_eq!(QueueFamilies { graphics: 0, present: Some(0) }.unique(), vec![0]);
    assert_eq!(QueueFamilies { graphics: 0, present: Some(1) }.unique(), vec![0, 1]);
    assert_eq!(QueueFamilies { graphics: 3, present: None }.unique(), vec![3]);
}
