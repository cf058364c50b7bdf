/// Pipeline variant builder
///
/// Turns a `RenderMode` into one `PipelineStateBundle` and links it, together
/// with the shader and vertex input, into a pipeline layout and pipeline.

use crate::error::Result;
use crate::{engine_bail, engine_warn};
use crate::graphics_device::{
    ColorBlendAttachment, ColorBlendState, DepthStencilState, DescriptorBinding, DescriptorKind,
    DescriptorSetLayoutHandle, GraphicsDevice, GraphicsPipelineDesc, InputAssemblyState,
    MultisampleState, PipelineHandle, PipelineLayoutHandle, PipelineStateBundle,
    ShaderProgram, VertexInputDescription, ViewportState, DYNAMIC_STATES,
};
use crate::pipeline::{PipelineConfig, RenderMode};

pub struct PipelineVariantBuilder<'a> {
    mode: RenderMode,
    shader: &'a ShaderProgram,
    vertex_input: &'a VertexInputDescription,
    descriptor_bindings: &'a [DescriptorBinding],
    config: &'a PipelineConfig,
}

impl<'a> PipelineVariantBuilder<'a> {
    pub fn new(
        mode: RenderMode,
        shader: &'a ShaderProgram,
        vertex_input: &'a VertexInputDescription,
        descriptor_bindings: &'a [DescriptorBinding],
        config: &'a PipelineConfig,
    ) -> Self {
        Self { mode, shader, vertex_input, descriptor_bindings, config }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Configuration checks that need no native call
    pub fn validate(&self) -> Result<()> {
        self.vertex_input.validate()?;
        self.shader.validate()?;
        self.config.validate_push_constants()?;
        self.config.validate_rasterization()?;
        if self.mode == RenderMode::MultiTarget {
            self.check_color_targets()?;
        }
        Ok(())
    }

    /// Fixed-function state for the mode
    pub fn state_bundle(&self) -> Result<PipelineStateBundle> {
        match self.mode {
            RenderMode::Opaque => Ok(self.opaque_state()),
            RenderMode::NoDepthTest => Ok(self.no_depth_test_state()),
            RenderMode::MultiTarget => self.multi_target_state(),
            RenderMode::MultiTexture => Ok(self.multi_texture_state()),
        }
    }

    /// Pipeline layout: the descriptor set layout plus the configured push constants
    pub fn create_pipeline_layout(
        &self,
        device: &mut dyn GraphicsDevice,
        set_layout: DescriptorSetLayoutHandle,
    ) -> Result<PipelineLayoutHandle> {
        device.create_pipeline_layout(&[set_layout], &self.config.push_constant_ranges)
    }

    pub fn create_pipeline(
        &self,
        device: &mut dyn GraphicsDevice,
        state: &PipelineStateBundle,
        layout: PipelineLayoutHandle,
    ) -> Result<PipelineHandle> {
        device.create_graphics_pipeline(&GraphicsPipelineDesc {
            shader: self.shader,
            vertex_input: self.vertex_input,
            state,
            layout,
            render_pass: self.config.render_pass,
            subpass: self.config.subpass,
        })
    }

    // Topology, rasterization, depth compare and samples come from the config
    fn opaque_state(&self) -> PipelineStateBundle {
        PipelineStateBundle {
            input_assembly: InputAssemblyState {
                topology: self.config.topology,
                ..InputAssemblyState::default()
            },
            rasterization: self.config.rasterization,
            color_blend: ColorBlendState::new(vec![ColorBlendAttachment::opaque()]),
            depth_stencil: DepthStencilState {
                depth_compare_op: self.config.depth_compare_op,
                ..DepthStencilState::depth_tested()
            },
            viewport: ViewportState::default(),
            multisample: MultisampleState {
                sample_count: self.config.sample_count,
                ..MultisampleState::default()
            },
            dynamic_states: &DYNAMIC_STATES,
        }
    }

    fn no_depth_test_state(&self) -> PipelineStateBundle {
        PipelineStateBundle {
            depth_stencil: DepthStencilState::disabled(),
            ..self.opaque_state()
        }
    }

    fn multi_target_state(&self) -> Result<PipelineStateBundle> {
        self.check_color_targets()?;
        Ok(PipelineStateBundle {
            color_blend: ColorBlendState::new(self.config.color_targets.clone()),
            ..self.opaque_state()
        })
    }

    // Same state as Opaque; the samplers come from the descriptor bindings
    fn multi_texture_state(&self) -> PipelineStateBundle {
        let samplers = self
            .descriptor_bindings
            .iter()
            .filter(|b| b.kind == DescriptorKind::CombinedImageSampler)
            .count();
        if samplers < 2 {
            engine_warn!("flounder::VariantBuilder",
                "MultiTexture pipeline declares {} sampled image binding(s)", samplers);
        }
        self.opaque_state()
    }

    fn check_color_targets(&self) -> Result<()> {
        if self.config.color_targets.is_empty() {
            engine_bail!("flounder::VariantBuilder", InvalidConfiguration,
                "MultiTarget pipeline needs at least one color target");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "variant_builder_tests.rs"]
mod tests;
