//! Unit tests for config.rs

use crate::error::Error;
use crate::renderer::{Config, DebugSeverity, DeviceType, Extent2D, TextureFormat, ValidationStats};

// ============================================================================
// DEFAULTS
// ============================================================================

#[test]
fn test_default_config_values() {
    let config = Config::default();
    assert_eq!(config.preferred_device_type, DeviceType::IntegratedGpu);
    assert_eq!(config.render_target_extent, Extent2D::new(1280, 720));
    assert_eq!(config.render_target_format, TextureFormat::R8G8B8A8_UNORM);
    assert_eq!(config.default_swapchain_extent, Extent2D::new(640, 480));
    assert_eq!(config.frames_in_flight, 2);
    assert_eq!(config.staging_buffer_size, 1920 * 1080 * 4);
    assert_eq!(config.upload_timeout_ns, 10_000_000);
    assert_eq!(config.frame_timeout_ns, 1_000_000_000);
    assert_eq!(config.clear_color, [1.0, 0.8, 0.4, 0.0]);
    assert_eq!(config.debug_severity, DebugSeverity::ErrorsAndWarnings);
}

#[test]
fn test_default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn test_validate_rejects_zero_render_target() {
    let config = Config {
        render_target_extent: Extent2D::new(0, 720),
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(Error::InitializationFailed(_))));
}

#[test]
fn test_validate_rejects_vertex_format_render_target() {
    let config = Config {
        render_target_format: TextureFormat::R32G32_SFLOAT,
        ..Config::default()
    };
    match config.validate() {
        Err(Error::InitializationFailed(msg)) => assert!(msg.contains("R32G32_SFLOAT")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_validate_accepts_every_rgba8_render_target() {
    for format in [
        TextureFormat::R8G8B8A8_SRGB,
        TextureFormat::R8G8B8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM,
    ] {
        let config = Config { render_target_format: format, ..Config::default() };
        assert!(config.validate().is_ok(), "{:?}", format);
    }
}

#[test]
fn test_validate_rejects_zero_swapchain_default() {
    let config = Config {
        default_swapchain_extent: Extent2D::new(640, 0),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_ring() {
    let config = Config { frames_in_flight: 0, ..Config::default() };
    match config.validate() {
        Err(Error::InitializationFailed(msg)) => assert!(msg.contains("frames_in_flight")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_validate_rejects_zero_staging() {
    let config = Config { staging_buffer_size: 0, ..Config::default() };
    assert!(config.validate().is_err());
}

// ============================================================================
// SMALL TYPES
// ============================================================================

#[test]
fn test_extent_helpers() {
    let extent = Extent2D::new(300, 200);
    assert_eq!(extent.pixel_count(), 60_000);
    assert!(!extent.is_empty());
    assert!(Extent2D::new(0, 5).is_empty());
}

#[test]
fn test_validation_stats_total() {
    let stats = ValidationStats { errors: 1, warnings: 2, info: 3, verbose: 4 };
    assert_eq!(stats.total(), 10);
    assert!(stats.has_errors());
    assert!(!ValidationStats::default().has_errors());
}
