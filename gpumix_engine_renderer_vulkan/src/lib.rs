/*!
# GpuMix Engine - Vulkan Renderer Backend

Vulkan implementation of the GpuMix textured-quad harness, built on `ash`.

- **OffscreenRenderer**: renders into an offscreen target and reads pixels back
- **OnscreenRenderer**: adds a swap chain; each frame is blitted into the
  acquired image and presented
- Device selection, memory-type lookup, staging uploads and the fixed pipeline
  are shared by both renderers

Validation layer messages are filtered and counted by `debug`, which also prints them.
*/

// Instance, device and queries
mod debug;
mod vulkan_instance;
mod vulkan_surface;
mod vulkan_context;
mod vulkan_query;
mod vulkan_select;
mod vulkan_format;

// Resources
mod vulkan_buffer;
mod vulkan_texture;
mod vulkan_sampler;
mod vulkan_shader;
mod vulkan_staging;
mod vulkan_command_list;
mod vulkan_barrier;

// Pipeline and frame rendering
mod vulkan_render_pass;
mod vulkan_frame_buffer;
mod vulkan_pipeline;
mod vulkan_render_target;
mod vulkan_frame;
mod vulkan_swapchain;
mod vulkan_offscreen;
mod vulkan_onscreen;

/// Public API of the Vulkan backend
pub mod gpumix {
    pub use crate::vulkan_offscreen::OffscreenRenderer;
    pub use crate::vulkan_onscreen::{OnscreenRenderer, FrameStatus};
    pub use crate::vulkan_swapchain::SwapchainStatus;
    pub use crate::vulkan_shader::{ShaderCode, ShaderStage};
    pub use crate::vulkan_context::DeviceContext;
    pub use crate::vulkan_instance::VulkanInstance;

    // Capability and selection helpers
    pub mod select {
        pub use crate::vulkan_select::*;
        pub use crate::vulkan_query::*;
    }

    // Validation statistics
    pub use crate::debug::{get_validation_stats, print_validation_stats_report};
}
