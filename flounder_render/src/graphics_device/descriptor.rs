/// Descriptor bindings and the resources written into them

use bitflags::bitflags;
use crate::graphics_device::{BufferHandle, ImageViewHandle, SamplerHandle};

/// Kind of shader-visible resource behind a descriptor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// Uniform/constant buffer
    UniformBuffer,
    /// Sampled texture + sampler
    CombinedImageSampler,
    /// Read/write image
    StorageImage,
    /// Read/write buffer
    StorageBuffer,
}

bitflags! {
    /// Shader stages that can access a resource
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const FRAGMENT = 0x02;
        const COMPUTE = 0x04;
        const GEOMETRY = 0x08;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

/// One shader-visible resource declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBinding {
    /// Binding slot (unique within a list)
    pub slot: u32,
    /// Resource kind
    pub kind: DescriptorKind,
    /// Stages that read the resource
    pub stages: ShaderStageFlags,
}

impl DescriptorBinding {
    pub fn new(slot: u32, kind: DescriptorKind, stages: ShaderStageFlags) -> Self {
        Self { slot, kind, stages }
    }

    pub fn uniform_buffer(slot: u32, stages: ShaderStageFlags) -> Self {
        Self::new(slot, DescriptorKind::UniformBuffer, stages)
    }

    pub fn sampled_image(slot: u32, stages: ShaderStageFlags) -> Self {
        Self::new(slot, DescriptorKind::CombinedImageSampler, stages)
    }

    pub fn storage_image(slot: u32, stages: ShaderStageFlags) -> Self {
        Self::new(slot, DescriptorKind::StorageImage, stages)
    }
}

/// Resource handle written into a descriptor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorResource {
    UniformBuffer {
        buffer: BufferHandle,
        offset: u64,
        range: u64,
    },
    StorageBuffer {
        buffer: BufferHandle,
        offset: u64,
        range: u64,
    },
    SampledImage {
        view: ImageViewHandle,
        sampler: SamplerHandle,
    },
    StorageImage {
        view: ImageViewHandle,
    },
}

impl DescriptorResource {
    /// Descriptor kind this resource can be written into
    pub fn kind(&self) -> DescriptorKind {
        match self {
            DescriptorResource::UniformBuffer { .. } => DescriptorKind::UniformBuffer,
            DescriptorResource::StorageBuffer { .. } => DescriptorKind::StorageBuffer,
            DescriptorResource::SampledImage { .. } => DescriptorKind::CombinedImageSampler,
            DescriptorResource::StorageImage { .. } => DescriptorKind::StorageImage,
        }
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
