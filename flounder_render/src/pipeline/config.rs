/// Per-pipeline configuration beyond mode, shader and resource layout

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    ColorBlendAttachment, CompareOp, PrimitiveTopology, PushConstantRange, RasterizationState,
    RenderPassHandle, SampleCount,
};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Render pass the pipeline is compatible with
    pub render_pass: RenderPassHandle,
    /// Subpass index within `render_pass`
    pub subpass: u32,
    /// Blend configuration per color target (used by `RenderMode::MultiTarget`)
    pub color_targets: Vec<ColorBlendAttachment>,
    /// Push constant ranges added to the pipeline layout
    pub push_constant_ranges: Vec<PushConstantRange>,
    pub topology: PrimitiveTopology,
    /// Culling, winding, fill mode and line width
    pub rasterization: RasterizationState,
    /// Depth comparison of the depth-tested modes (ignored by `NoDepthTest`)
    pub depth_compare_op: CompareOp,
    /// Must match the sample count of the render pass attachments
    pub sample_count: SampleCount,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            render_pass: RenderPassHandle::NULL,
            subpass: 0,
            color_targets: vec![ColorBlendAttachment::opaque()],
            push_constant_ranges: Vec::new(),
            topology: PrimitiveTopology::TriangleList,
            rasterization: RasterizationState::default(),
            depth_compare_op: CompareOp::LessOrEqual,
            sample_count: SampleCount::S1,
        }
    }
}

impl PipelineConfig {
    /// Config targeting `render_pass`
    pub fn for_render_pass(render_pass: RenderPassHandle, subpass: u32) -> Self {
        Self {
            render_pass,
            subpass,
            ..Self::default()
        }
    }

    /// Replace the color targets with `count` opaque attachments
    pub fn with_color_targets(mut self, count: usize) -> Self {
        self.color_targets = vec![ColorBlendAttachment::opaque(); count];
        self
    }

    pub fn with_push_constant_range(mut self, range: PushConstantRange) -> Self {
        self.push_constant_ranges.push(range);
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_rasterization(mut self, rasterization: RasterizationState) -> Self {
        self.rasterization = rasterization;
        self
    }

    /// Reverse-Z setups use `GreaterOrEqual`
    pub fn with_depth_compare_op(mut self, op: CompareOp) -> Self {
        self.depth_compare_op = op;
        self
    }

    pub fn with_sample_count(mut self, sample_count: SampleCount) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Line width must be a positive finite number
    pub fn validate_rasterization(&self) -> Result<()> {
        let width = self.rasterization.line_width;
        if !width.is_finite() || width <= 0.0 {
            engine_bail!("flounder::Pipeline", InvalidConfiguration,
                "Line width {} is not a positive finite number", width);
        }
        Ok(())
    }

    /// Push constant ranges must be non-empty, 4-byte aligned and name a stage
    pub fn validate_push_constants(&self) -> Result<()> {
        for range in &self.push_constant_ranges {
            if range.size == 0 || range.size % 4 != 0 || range.offset % 4 != 0 {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Push constant range at offset {} with size {} is not a non-empty multiple of 4",
                    range.offset, range.size);
            }
            if range.stages.is_empty() {
                engine_bail!("flounder::Pipeline", InvalidConfiguration,
                    "Push constant range at offset {} has no shader stage", range.offset);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
