//! Unit tests for the blit region and frame status

use crate::vulkan_onscreen::{blit_region, FrameStatus};
use crate::vulkan_swapchain::SwapchainStatus;
use ash::vk;

#[test]
fn test_blit_region_stretches_full_images() {
    let region = blit_region(
        vk::Extent2D { width: 1280, height: 720 },
        vk::Extent2D { width: 800, height: 600 },
    );
    assert_eq!(region.src_offsets[0], vk::Offset3D { x: 0, y: 0, z: 0 });
    assert_eq!(region.src_offsets[1], vk::Offset3D { x: 1280, y: 720, z: 1 });
    assert_eq!(region.dst_offsets[1], vk::Offset3D { x: 800, y: 600, z: 1 });
    assert_eq!(region.src_subresource.aspect_mask, vk::ImageAspectFlags::COLOR);
    assert_eq!(region.dst_subresource.layer_count, 1);
}

#[test]
fn test_frame_status_needs_recreation() {
    let optimal = FrameStatus { acquire: SwapchainStatus::Optimal, present: SwapchainStatus::Optimal };
    assert!(!optimal.needs_recreation());

    let suboptimal = FrameStatus { acquire: SwapchainStatus::Optimal, present: SwapchainStatus::Suboptimal };
    assert!(suboptimal.needs_recreation());

    let out_of_date = FrameStatus { acquire: SwapchainStatus::OutOfDate, present: SwapchainStatus::OutOfDate };
    assert!(out_of_date.needs_recreation());
}
