/*!
# GpuMix Engine

Backend-agnostic core of the GpuMix textured-quad harness.

This crate holds everything the Vulkan backend and the demo share without
touching the graphics API:

- **Error**: crate-wide error enum and `Result` alias
- **Engine**: global, swappable logger
- **Config**: renderer construction parameters
- **Vertex / TextureData**: CPU-side data uploaded by the renderers
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod renderer;

// Main gpumix namespace module
pub mod gpumix {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (logging entry point)
    pub use crate::engine::Engine;

    // Logging sub-module (types only; macros are exported at crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, FileLogger, format_plain};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }
}

// Re-export math library at crate root
pub use glam;
