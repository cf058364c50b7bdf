/// Vertex input description: bindings (buffers) and attributes (shader inputs)

use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::engine_bail;

/// Buffer data format for vertex attributes
///
/// Defines the data type and component count of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    // Float formats
    R32_SFLOAT,         // float (4 bytes)
    R32G32_SFLOAT,      // vec2 (8 bytes)
    R32G32B32_SFLOAT,   // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)

    // Integer formats (signed)
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,

    // Integer formats (unsigned)
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,

    // Short formats
    R16G16_SINT,
    R16G16B16A16_SINT,
    R16G16_UINT,
    R16G16B16A16_UINT,

    // Byte formats
    R8G8B8A8_UINT,
    R8G8B8A8_UNORM,
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT | BufferFormat::R32_SINT | BufferFormat::R32_UINT => 4,
            BufferFormat::R32G32_SFLOAT | BufferFormat::R32G32_SINT | BufferFormat::R32G32_UINT => 8,
            BufferFormat::R32G32B32_SFLOAT | BufferFormat::R32G32B32_SINT | BufferFormat::R32G32B32_UINT => 12,
            BufferFormat::R32G32B32A32_SFLOAT | BufferFormat::R32G32B32A32_SINT | BufferFormat::R32G32B32A32_UINT => 16,
            BufferFormat::R16G16_SINT | BufferFormat::R16G16_UINT => 4,
            BufferFormat::R16G16B16A16_SINT | BufferFormat::R16G16B16A16_UINT => 8,
            BufferFormat::R8G8B8A8_UINT | BufferFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

/// Vertex binding description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBinding {
    /// Binding index
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate (per-vertex or per-instance)
    pub input_rate: VertexInputRate,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Binding index
    pub binding: u32,
    /// Format of the attribute (data type and component count)
    pub format: BufferFormat,
    /// Offset in bytes from the start of the element
    pub offset: u32,
}

/// Vertex input layout, supplied fully formed by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexInputDescription {
    pub bindings: Vec<VertexBinding>,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexInputDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a per-vertex binding
    pub fn with_binding(mut self, binding: u32, stride: u32) -> Self {
        self.bindings.push(VertexBinding {
            binding,
            stride,
            input_rate: VertexInputRate::Vertex,
        });
        self
    }

    /// Add a per-instance binding
    pub fn with_instance_binding(mut self, binding: u32, stride: u32) -> Self {
        self.bindings.push(VertexBinding {
            binding,
            stride,
            input_rate: VertexInputRate::Instance,
        });
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, location: u32, binding: u32, format: BufferFormat, offset: u32) -> Self {
        self.attributes.push(VertexAttribute { location, binding, format, offset });
        self
    }

    /// Declared binding with index `binding`
    pub fn binding(&self, binding: u32) -> Option<&VertexBinding> {
        self.bindings.iter().find(|b| b.binding == binding)
    }

    /// Check internal consistency
    ///
    /// Every attribute must reference a declared binding. Binding indices and
    /// attribute locations must be unique. Attributes may overrun the stride
    /// (interleaved or overlapping layouts).
    pub fn validate(&self) -> Result<()> {
        let mut binding_indices = FxHashSet::default();
        for b in &self.bindings {
            if !binding_indices.insert(b.binding) {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Vertex binding {} declared twice", b.binding);
            }
        }

        let mut locations = FxHashSet::default();
        for attr in &self.attributes {
            if self.binding(attr.binding).is_none() {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Vertex attribute at location {} references unknown binding {}",
                    attr.location, attr.binding);
            }

            if !locations.insert(attr.location) {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Vertex attribute location {} declared twice", attr.location);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "vertex_input_tests.rs"]
mod tests;
