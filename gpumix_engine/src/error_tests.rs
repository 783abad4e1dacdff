//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("vkQueueSubmit returned ERROR_DEVICE_LOST".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Backend error"));
    assert!(display.contains("ERROR_DEVICE_LOST"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("SPIR-V length 13 is not a multiple of 4".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid resource"));
    assert!(display.contains("multiple of 4"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("No compatible memory type".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Initialization failed"));
    assert!(display.contains("memory type"));
}

#[test]
fn test_timeout_display() {
    let err = Error::Timeout("frame fence".to_string());
    assert_eq!(format!("{}", err), "Timeout: frame fence");
}

#[test]
fn test_unsupported_display() {
    let err = Error::Unsupported("VK_KHR_swapchain".to_string());
    assert_eq!(format!("{}", err), "Unsupported: VK_KHR_swapchain");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug_names_variant() {
    assert!(format!("{:?}", Error::Timeout("x".into())).contains("Timeout"));
    assert!(format!("{:?}", Error::Unsupported("x".into())).contains("Unsupported"));
    assert!(format!("{:?}", Error::OutOfMemory).contains("OutOfMemory"));
}

#[test]
fn test_error_clone_keeps_message() {
    let err = Error::InitializationFailed("no device".to_string());
    let copy = err.clone();
    assert_eq!(format!("{}", err), format!("{}", copy));
}

// ============================================================================
// ERROR PROPAGATION TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<u32> {
        Err(Error::Timeout("upload fence".to_string()))
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    match outer() {
        Err(Error::Timeout(msg)) => assert_eq!(msg, "upload fence"),
        other => panic!("unexpected result: {:?}", other),
    }
}
