/*!
# Flounder Render

Pipeline-state and GPU-resource layer of the Flounder renderer.

This crate provides the backend-neutral API: the `GraphicsDevice` trait every
native backend implements, the fixed-function state types, and the objects
that own GPU state for a draw batch. Backend implementations (Vulkan, etc.)
live in their own crates.

## Architecture

- **GraphicsDevice**: native API seam (descriptor layouts, pools, sets, pipeline layouts, pipelines)
- **DescriptorSetManager**: layout + single-set pool + set for one binding list
- **PipelineVariantBuilder**: per-`RenderMode` state bundle and pipeline creation
- **Pipeline**: orchestrates creation in dependency order and ordered teardown
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod pipeline;

// Main flounder namespace module
pub mod flounder {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Native API seam
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with device-level types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Pipeline sub-module
    pub mod pipeline {
        pub use crate::pipeline::*;
    }
}
