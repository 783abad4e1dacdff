//! Error types for the GpuMix engine
//!
//! This module defines the error types used throughout the engine,
//! including device selection, resource creation, uploads and frame submission.

use std::fmt;

/// Result type for GpuMix engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// GpuMix engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (a failing Vulkan call)
    BackendError(String),

    /// Out of GPU or host memory
    OutOfMemory,

    /// Invalid resource or caller data (pixel buffer size, SPIR-V blob, payload size)
    InvalidResource(String),

    /// Initialization failed (instance, device, memory type, object creation)
    InitializationFailed(String),

    /// A bounded fence wait expired
    Timeout(String),

    /// A required capability (layer, extension, usage flag) is missing
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
