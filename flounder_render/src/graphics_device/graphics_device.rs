/// GraphicsDevice trait - the native API seam
///
/// Every native object the render core creates or destroys goes through this
/// trait. Backends (Vulkan, mock) hand back opaque `u64` handles.

use crate::error::Result;
use crate::graphics_device::{
    DescriptorBinding, DescriptorKind, DescriptorResource,
    PipelineStateBundle, PushConstantRange, ShaderProgram, VertexInputDescription,
};

// ============================================================================
// Native handles
// ============================================================================

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u64);

        impl $name {
            /// "Not yet created" sentinel
            pub const NULL: Self = Self(0);

            /// Wrap a raw backend handle
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw backend handle
            pub const fn as_raw(self) -> u64 {
                self.0
            }

            /// True for the `NULL` sentinel
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

native_handle!(
    /// Descriptor set layout (owned by the core)
    DescriptorSetLayoutHandle
);
native_handle!(
    /// Descriptor pool (owned by the core)
    DescriptorPoolHandle
);
native_handle!(
    /// Descriptor set (freed with its pool)
    DescriptorSetHandle
);
native_handle!(
    /// Pipeline layout (owned by the core)
    PipelineLayoutHandle
);
native_handle!(
    /// Graphics pipeline (owned by the core)
    PipelineHandle
);
native_handle!(
    /// Compiled shader module (external)
    ShaderModuleHandle
);
native_handle!(
    /// Render pass the pipeline is compatible with (external)
    RenderPassHandle
);
native_handle!(
    /// GPU buffer (external)
    BufferHandle
);
native_handle!(
    /// Image view (external)
    ImageViewHandle
);
native_handle!(
    /// Sampler (external)
    SamplerHandle
);

// ============================================================================
// Creation descriptors
// ============================================================================

/// Number of descriptors of one kind a pool can hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorPoolSize {
    pub kind: DescriptorKind,
    pub count: u32,
}

/// Descriptor for creating a descriptor pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorPoolDesc {
    /// Maximum number of sets that can be allocated
    pub max_sets: u32,
    /// Per-kind descriptor capacity
    pub sizes: Vec<DescriptorPoolSize>,
}

/// One resource written into a descriptor set slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorWrite {
    pub slot: u32,
    pub resource: DescriptorResource,
}

/// Descriptor for creating a graphics pipeline
#[derive(Debug, Clone, Copy)]
pub struct GraphicsPipelineDesc<'a> {
    /// Programmable stages
    pub shader: &'a ShaderProgram,
    /// Vertex bindings and attributes
    pub vertex_input: &'a VertexInputDescription,
    /// Fixed-function state
    pub state: &'a PipelineStateBundle,
    /// Layout built from the descriptor set layout and push constants
    pub layout: PipelineLayoutHandle,
    /// Compatible render pass
    pub render_pass: RenderPassHandle,
    /// Subpass index within `render_pass`
    pub subpass: u32,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Native graphics device
///
/// Implemented by backend-specific devices (e.g., VulkanGraphicsDevice).
/// Shared as `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send + Sync {
    /// Create a descriptor set layout whose binding list matches `bindings` exactly
    fn create_descriptor_set_layout(
        &mut self,
        bindings: &[DescriptorBinding],
    ) -> Result<DescriptorSetLayoutHandle>;

    /// Destroy a descriptor set layout
    fn destroy_descriptor_set_layout(&mut self, layout: DescriptorSetLayoutHandle);

    /// Create a descriptor pool
    fn create_descriptor_pool(&mut self, desc: &DescriptorPoolDesc) -> Result<DescriptorPoolHandle>;

    /// Destroy a descriptor pool and every set allocated from it
    fn destroy_descriptor_pool(&mut self, pool: DescriptorPoolHandle);

    /// Allocate one descriptor set of `layout` from `pool`
    ///
    /// Returns `Error::DescriptorPoolExhausted` when the pool cannot satisfy
    /// the allocation.
    fn allocate_descriptor_set(
        &mut self,
        pool: DescriptorPoolHandle,
        layout: DescriptorSetLayoutHandle,
    ) -> Result<DescriptorSetHandle>;

    /// Write resource handles into the slots of a descriptor set
    fn write_descriptor_set(
        &mut self,
        set: DescriptorSetHandle,
        writes: &[DescriptorWrite],
    ) -> Result<()>;

    /// Create a pipeline layout
    ///
    /// # Arguments
    ///
    /// * `set_layouts` - Descriptor set layouts, in set-index order
    /// * `push_constant_ranges` - Push constant ranges (may be empty)
    fn create_pipeline_layout(
        &mut self,
        set_layouts: &[DescriptorSetLayoutHandle],
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<PipelineLayoutHandle>;

    /// Destroy a pipeline layout
    fn destroy_pipeline_layout(&mut self, layout: PipelineLayoutHandle);

    /// Create a graphics pipeline
    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_>) -> Result<PipelineHandle>;

    /// Destroy a graphics pipeline
    fn destroy_pipeline(&mut self, pipeline: PipelineHandle);
}
