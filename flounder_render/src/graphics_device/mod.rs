/// Graphics device module - native API seam and backend-neutral GPU types

// Module declarations
pub mod graphics_device;
pub mod descriptor;
pub mod shader;
pub mod vertex_input;
pub mod pipeline_state;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use descriptor::*;
pub use shader::*;
pub use vertex_input::*;
pub use pipeline_state::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
