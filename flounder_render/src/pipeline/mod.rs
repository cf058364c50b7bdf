/// Pipeline module - render modes, descriptor management, variant building
/// and the Pipeline orchestrator

pub mod render_mode;
pub mod config;
pub mod descriptor_set_manager;
pub mod variant_builder;
pub mod pipeline;

pub use render_mode::*;
pub use config::*;
pub use descriptor_set_manager::*;
pub use variant_builder::*;
pub use pipeline::*;
