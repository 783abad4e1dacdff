//! Unit tests for swap chain parameter helpers

use crate::vulkan_swapchain::{image_sharing, supported_present_mode, SwapchainStatus};
use ash::vk;

#[test]
fn test_same_family_is_exclusive() {
    let (mode, families) = image_sharing(0, 0);
    assert_eq!(mode, vk::SharingMode::EXCLUSIVE);
    assert!(families.is_empty());
}

#[test]
fn test_distinct_families_are_concurrent() {
    let (mode, families) = image_sharing(0, 2);
    assert_eq!(mode, vk::SharingMode::CONCURRENT);
    assert_eq!(families, vec![0, 2]);
}

#[test]
fn test_present_mode_keeps_mailbox() {
    let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
    assert_eq!(supported_present_mode(&modes), vk::PresentModeKHR::MAILBOX);
}

#[test]
fn test_present_mode_keeps_listed_immediate() {
    let modes = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::IMMEDIATE];
    assert_eq!(supported_present_mode(&modes), vk::PresentModeKHR::IMMEDIATE);
}

#[test]
fn test_present_mode_falls_back_to_fifo_when_unlisted() {
    let modes = [vk::PresentModeKHR::FIFO];
    assert_eq!(supported_present_mode(&modes), vk::PresentModeKHR::FIFO);
}

#[test]
fn test_status_optimal() {
    assert!(SwapchainStatus::Optimal.is_optimal());
    assert!(!SwapchainStatus::Suboptimal.is_optimal());
    assert!(!SwapchainStatus::OutOfDate.is_optimal());
}
