/// Renderer configuration, debug-messenger settings and validation statistics

use crate::error::{Error, Result};

// ===== EXTENT =====

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this extent
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ===== DEVICE PREFERENCE =====

/// Physical device category used to rank otherwise equivalent adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Other,
    IntegratedGpu,
    DiscreteGpu,
    VirtualGpu,
    Cpu,
}

// ===== DEBUG SETTINGS =====

/// Minimum validation message severity that gets reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    /// Only errors
    ErrorsOnly,
    /// Errors and warnings
    ErrorsAndWarnings,
    /// Everything including info and verbose
    All,
}

/// Destination of validation messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugOutput {
    /// Colored output on stderr
    Console,
    /// Plain text appended to a file
    File(String),
    /// Both console and file
    Both(String),
}

/// Per-category switches for validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessageFilter {
    pub show_general: bool,
    pub show_validation: bool,
    pub show_performance: bool,
}

impl Default for DebugMessageFilter {
    fn default() -> Self {
        Self {
            show_general: true,
            show_validation: true,
            show_performance: true,
        }
    }
}

/// Validation message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

// ===== CONFIG =====

/// Configuration passed to the offscreen and onscreen renderers at construction
///
/// All values that used to be baked into the rendering logic (render target size,
/// ring size, fence timeouts, clear color) live here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name reported to the driver
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Enable the Khronos validation layer (dropped at runtime when unavailable)
    pub enable_validation: bool,
    /// Validation messages below this level are ignored
    pub debug_severity: DebugSeverity,
    /// Where validation messages go
    pub debug_output: DebugOutput,
    /// Which validation categories are shown
    pub debug_message_filter: DebugMessageFilter,
    /// Abort the process on the first validation error
    pub break_on_validation_error: bool,
    /// Count validation messages per severity
    pub enable_validation_stats: bool,
    /// Device type picked first when several adapters qualify
    pub preferred_device_type: DeviceType,
    /// Size of the offscreen render target
    pub render_target_extent: Extent2D,
    /// Format of the offscreen render target (onscreen uses the swap chain format)
    pub render_target_format: crate::renderer::TextureFormat,
    /// Swap chain size used only when the surface leaves the extent to the application
    pub default_swapchain_extent: Extent2D,
    /// Number of ring slots for the offscreen renderer
    pub frames_in_flight: u32,
    /// Size in bytes of the upload staging buffer
    pub staging_buffer_size: u64,
    /// Fence timeout for uploads, in nanoseconds
    pub upload_timeout_ns: u64,
    /// Fence timeout for a frame slot, in nanoseconds
    pub frame_timeout_ns: u64,
    /// RGBA clear color of the render pass
    pub clear_color: [f32; 4],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "GpuMix".to_string(),
            app_version: (0, 1, 0),
            enable_validation: cfg!(debug_assertions),
            debug_severity: DebugSeverity::ErrorsAndWarnings,
            debug_output: DebugOutput::Console,
            debug_message_filter: DebugMessageFilter::default(),
            break_on_validation_error: false,
            enable_validation_stats: true,
            preferred_device_type: DeviceType::IntegratedGpu,
            render_target_extent: Extent2D::new(1280, 720),
            render_target_format: crate::renderer::TextureFormat::R8G8B8A8_UNORM,
            default_swapchain_extent: Extent2D::new(640, 480),
            frames_in_flight: 2,
            staging_buffer_size: 1920 * 1080 * 4,
            upload_timeout_ns: 10_000_000,
            frame_timeout_ns: 1_000_000_000,
            clear_color: [1.0, 0.8, 0.4, 0.0],
        }
    }
}

impl Config {
    /// Reject values the renderers cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.render_target_extent.is_empty() {
            return Err(Error::InitializationFailed(format!(
                "Render target extent must be non-zero, got {}x{}",
                self.render_target_extent.width, self.render_target_extent.height
            )));
        }
        let format = self.render_target_format;
        if !format.is_color() || format.bytes_per_pixel() != 4 {
            return Err(Error::InitializationFailed(format!(
                "Render target format must be 8-bit RGBA/BGRA, got {:?}", format
            )));
        }
        if self.default_swapchain_extent.is_empty() {
            return Err(Error::InitializationFailed(format!(
                "Default swap chain extent must be non-zero, got {}x{}",
                self.default_swapchain_extent.width, self.default_swapchain_extent.height
            )));
        }
        if self.frames_in_flight == 0 {
            return Err(Error::InitializationFailed(
                "frames_in_flight must be at least 1".to_string(),
            ));
        }
        if self.staging_buffer_size == 0 {
            return Err(Error::InitializationFailed(
                "staging_buffer_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
