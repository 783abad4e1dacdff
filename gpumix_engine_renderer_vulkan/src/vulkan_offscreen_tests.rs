//! Unit tests for upload validation helpers

use crate::vulkan_offscreen::{check_texture_upload, check_vertex_upload, texture_upload_region};
use ash::vk;
use gpumix_engine::gpumix::Error;
use gpumix_engine::gpumix::render::{TextureData, Vertex};

#[test]
fn test_texture_upload_matching_size() {
    let data = TextureData::solid(4, 2, [255, 0, 0, 255]).unwrap();
    assert!(check_texture_upload(vk::Extent2D { width: 4, height: 2 }, &data).is_ok());
}

#[test]
fn test_texture_upload_size_mismatch() {
    let data = TextureData::solid(4, 2, [255, 0, 0, 255]).unwrap();
    let result = check_texture_upload(vk::Extent2D { width: 2, height: 4 }, &data);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_vertex_upload_fits() {
    let capacity = 4 * Vertex::STRIDE as u64;
    assert!(check_vertex_upload(capacity, 4).is_ok());
    assert!(check_vertex_upload(capacity, 2).is_ok());
}

#[test]
fn test_vertex_upload_too_large() {
    let capacity = 4 * Vertex::STRIDE as u64;
    assert!(matches!(check_vertex_upload(capacity, 5), Err(Error::InvalidResource(_))));
}

#[test]
fn test_vertex_upload_empty_rejected() {
    assert!(check_vertex_upload(64, 0).is_err());
}

#[test]
fn test_texture_upload_region_is_tightly_packed() {
    let region = texture_upload_region(vk::Extent2D { width: 16, height: 8 });
    assert_eq!(region.buffer_row_length, 0);
    assert_eq!(region.buffer_image_height, 0);
    assert_eq!(region.image_extent, vk::Extent3D { width: 16, height: 8, depth: 1 });
}
