/// Vulkan implementation of the flounder GraphicsDevice
///
/// Wraps a logical device created by the application. Handles crossing the
/// trait are the raw `u64` values of the Vulkan handles.

use std::ffi::CString;
use ash::vk;
use ash::vk::Handle;
use flounder_render::{engine_bail, engine_debug, engine_err};
use flounder_render::flounder::{GraphicsDevice, Result};
use flounder_render::flounder::render::{
    DescriptorBinding, DescriptorPoolDesc, DescriptorPoolHandle, DescriptorResource,
    DescriptorSetHandle, DescriptorSetLayoutHandle, DescriptorWrite, GraphicsPipelineDesc,
    PipelineHandle, PipelineLayoutHandle, PushConstantRange,
};
use crate::vulkan_format::{
    buffer_format_to_vk, color_blend_attachment_to_vk, compare_op_to_vk, cull_mode_to_vk,
    descriptor_kind_to_vk, dynamic_state_to_vk, front_face_to_vk, input_rate_to_vk,
    polygon_mode_to_vk, sample_count_to_vk, shader_stage_to_vk, stage_flags_to_vk,
    topology_to_vk, vk_result_to_error,
};

pub struct VulkanGraphicsDevice {
    device: ash::Device,
}

impl VulkanGraphicsDevice {
    /// Wrap an existing logical device
    ///
    /// The device is not destroyed on drop: the caller owns it and must keep
    /// it alive until every pipeline built on it has been cleaned up.
    pub fn new(device: ash::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

impl GraphicsDevice for VulkanGraphicsDevice {
    fn create_descriptor_set_layout(
        &mut self,
        bindings: &[DescriptorBinding],
    ) -> Result<DescriptorSetLayoutHandle> {
        let vk_bindings: Vec<vk::DescriptorSetLayoutBinding> = bindings
            .iter()
            .map(|binding| {
                vk::DescriptorSetLayoutBinding::default()
                    .binding(binding.slot)
                    .descriptor_type(descriptor_kind_to_vk(binding.kind))
                    .descriptor_count(1)
                    .stage_flags(stage_flags_to_vk(binding.stages))
            })
            .collect();

        let create_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&vk_bindings);

        let layout = unsafe { self.device.create_descriptor_set_layout(&create_info, None) }
            .map_err(|e| vk_result_to_error("create descriptor set layout", e))?;

        Ok(DescriptorSetLayoutHandle::from_raw(layout.as_raw()))
    }

    fn destroy_descriptor_set_layout(&mut self, layout: DescriptorSetLayoutHandle) {
        unsafe {
            self.device.destroy_descriptor_set_layout(
                vk::DescriptorSetLayout::from_raw(layout.as_raw()),
                None,
            );
        }
    }

    fn create_descriptor_pool(&mut self, desc: &DescriptorPoolDesc) -> Result<DescriptorPoolHandle> {
        let mut pool_sizes: Vec<vk::DescriptorPoolSize> = desc
            .sizes
            .iter()
            .map(|size| vk::DescriptorPoolSize {
                ty: descriptor_kind_to_vk(size.kind),
                descriptor_count: size.count,
            })
            .collect();

        // A pool needs at least one size entry, even for a binding-free layout
        if pool_sizes.is_empty() {
            pool_sizes.push(vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: 1,
            });
        }

        let create_info = vk::DescriptorPoolCreateInfo::default()
            .max_sets(desc.max_sets)
            .pool_sizes(&pool_sizes);

        let pool = unsafe { self.device.create_descriptor_pool(&create_info, None) }
            .map_err(|e| vk_result_to_error("create descriptor pool", e))?;

        Ok(DescriptorPoolHandle::from_raw(pool.as_raw()))
    }

    fn destroy_descriptor_pool(&mut self, pool: DescriptorPoolHandle) {
        // Frees every set allocated from the pool
        unsafe {
            self.device
                .destroy_descriptor_pool(vk::DescriptorPool::from_raw(pool.as_raw()), None);
        }
    }

    fn allocate_descriptor_set(
        &mut self,
        pool: DescriptorPoolHandle,
        layout: DescriptorSetLayoutHandle,
    ) -> Result<DescriptorSetHandle> {
        let set_layouts = [vk::DescriptorSetLayout::from_raw(layout.as_raw())];
        let allocate_info = vk::DescriptorSetAllocateInfo::default()
            .descriptor_pool(vk::DescriptorPool::from_raw(pool.as_raw()))
            .set_layouts(&set_layouts);

        let sets = unsafe { self.device.allocate_descriptor_sets(&allocate_info) }
            .map_err(|e| vk_result_to_error("allocate descriptor set", e))?;

        match sets.first() {
            Some(set) => Ok(DescriptorSetHandle::from_raw(set.as_raw())),
            None => engine_bail!("flounder::vulkan", "Descriptor set allocation returned no set"),
        }
    }

    fn write_descriptor_set(
        &mut self,
        set: DescriptorSetHandle,
        writes: &[DescriptorWrite],
    ) -> Result<()> {
        let dst_set = vk::DescriptorSet::from_raw(set.as_raw());

        // Resource infos must stay in place while the writes point at them
        let mut buffer_infos = Vec::with_capacity(writes.len());
        let mut image_infos = Vec::with_capacity(writes.len());
        for write in writes {
            match write.resource {
                DescriptorResource::UniformBuffer { buffer, offset, range }
                | DescriptorResource::StorageBuffer { buffer, offset, range } => {
                    buffer_infos.push(vk::DescriptorBufferInfo {
                        buffer: vk::Buffer::from_raw(buffer.as_raw()),
                        offset,
                        range,
                    });
                }
                DescriptorResource::SampledImage { view, sampler } => {
                    image_infos.push(vk::DescriptorImageInfo {
                        sampler: vk::Sampler::from_raw(sampler.as_raw()),
                        image_view: vk::ImageView::from_raw(view.as_raw()),
                        image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
                    });
                }
                DescriptorResource::StorageImage { view } => {
                    image_infos.push(vk::DescriptorImageInfo {
                        sampler: vk::Sampler::null(),
                        image_view: vk::ImageView::from_raw(view.as_raw()),
                        image_layout: vk::ImageLayout::GENERAL,
                    });
                }
            }
        }

        let mut vk_writes = Vec::with_capacity(writes.len());
        let mut next_buffer = 0;
        let mut next_image = 0;
        for write in writes {
            let vk_write = vk::WriteDescriptorSet::default()
                .dst_set(dst_set)
                .dst_binding(write.slot)
                .dst_array_element(0)
                .descriptor_type(descriptor_kind_to_vk(write.resource.kind()));

            let vk_write = match write.resource {
                DescriptorResource::UniformBuffer { .. } | DescriptorResource::StorageBuffer { .. } => {
                    let info = &buffer_infos[next_buffer];
                    next_buffer += 1;
                    vk_write.buffer_info(std::slice::from_ref(info))
                }
                DescriptorResource::SampledImage { .. } | DescriptorResource::StorageImage { .. } => {
                    let info = &image_infos[next_image];
                    next_image += 1;
                    vk_write.image_info(std::slice::from_ref(info))
                }
            };
            vk_writes.push(vk_write);
        }

        unsafe {
            self.device.update_descriptor_sets(&vk_writes, &[]);
        }

        Ok(())
    }

    fn create_pipeline_layout(
        &mut self,
        set_layouts: &[DescriptorSetLayoutHandle],
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<PipelineLayoutHandle> {
        let vk_set_layouts: Vec<vk::DescriptorSetLayout> = set_layouts
            .iter()
            .map(|layout| vk::DescriptorSetLayout::from_raw(layout.as_raw()))
            .collect();

        let vk_push_ranges: Vec<vk::PushConstantRange> = push_constant_ranges
            .iter()
            .map(|range| vk::PushConstantRange {
                stage_flags: stage_flags_to_vk(range.stages),
                offset: range.offset,
                size: range.size,
            })
            .collect();

        let create_info = vk::PipelineLayoutCreateInfo::default()
            .set_layouts(&vk_set_layouts)
            .push_constant_ranges(&vk_push_ranges);

        let layout = unsafe { self.device.create_pipeline_layout(&create_info, None) }
            .map_err(|e| vk_result_to_error("create pipeline layout", e))?;

        Ok(PipelineLayoutHandle::from_raw(layout.as_raw()))
    }

    fn destroy_pipeline_layout(&mut self, layout: PipelineLayoutHandle) {
        unsafe {
            self.device
                .destroy_pipeline_layout(vk::PipelineLayout::from_raw(layout.as_raw()), None);
        }
    }

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_>) -> Result<PipelineHandle> {
        if desc.render_pass.is_null() {
            engine_bail!("flounder::vulkan", InvalidConfiguration,
                "Graphics pipeline needs a render pass");
        }

        // Shader stages
        let entry_points = desc
            .shader
            .stages
            .iter()
            .map(|stage| {
                CString::new(stage.entry_point.as_str()).map_err(|_| {
                    engine_err!("flounder::vulkan", InvalidConfiguration,
                        "Entry point '{}' contains a NUL byte", stage.entry_point)
                })
            })
            .collect::<Result<Vec<CString>>>()?;

        let shader_stages: Vec<vk::PipelineShaderStageCreateInfo> = desc
            .shader
            .stages
            .iter()
            .zip(&entry_points)
            .map(|(stage, entry_point)| {
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(shader_stage_to_vk(stage.stage))
                    .module(vk::ShaderModule::from_raw(stage.module.as_raw()))
                    .name(entry_point.as_c_str())
            })
            .collect();

        // Vertex input
        let vertex_bindings: Vec<vk::VertexInputBindingDescription> = desc
            .vertex_input
            .bindings
            .iter()
            .map(|binding| vk::VertexInputBindingDescription {
                binding: binding.binding,
                stride: binding.stride,
                input_rate: input_rate_to_vk(binding.input_rate),
            })
            .collect();

        let vertex_attributes: Vec<vk::VertexInputAttributeDescription> = desc
            .vertex_input
            .attributes
            .iter()
            .map(|attribute| vk::VertexInputAttributeDescription {
                location: attribute.location,
                binding: attribute.binding,
                format: buffer_format_to_vk(attribute.format),
                offset: attribute.offset,
            })
            .collect();

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
            .vertex_binding_descriptions(&vertex_bindings)
            .vertex_attribute_descriptions(&vertex_attributes);

        let state = desc.state;

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
            .topology(topology_to_vk(state.input_assembly.topology))
            .primitive_restart_enable(state.input_assembly.primitive_restart_enable);

        // Viewport and scissor rectangles are dynamic, only the counts are baked in
        let viewport_state = vk::PipelineViewportStateCreateInfo::default()
            .viewport_count(state.viewport.viewport_count)
            .scissor_count(state.viewport.scissor_count);

        let raster = &state.rasterization;
        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(polygon_mode_to_vk(raster.polygon_mode))
            .line_width(raster.line_width)
            .cull_mode(cull_mode_to_vk(raster.cull_mode))
            .front_face(front_face_to_vk(raster.front_face))
            .depth_bias_enable(false);

        let depth = &state.depth_stencil;
        let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::default()
            .depth_test_enable(depth.depth_test_enable)
            .depth_write_enable(depth.depth_write_enable)
            .depth_compare_op(compare_op_to_vk(depth.depth_compare_op))
            .depth_bounds_test_enable(false)
            .stencil_test_enable(false);

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
            .sample_shading_enable(false)
            .rasterization_samples(sample_count_to_vk(state.multisample.sample_count))
            .alpha_to_coverage_enable(state.multisample.alpha_to_coverage);

        // One attachment state per color target
        let color_blend_attachments: Vec<vk::PipelineColorBlendAttachmentState> = state
            .color_blend
            .attachments
            .iter()
            .map(color_blend_attachment_to_vk)
            .collect();

        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
            .logic_op_enable(false)
            .attachments(&color_blend_attachments)
            .blend_constants(state.color_blend.blend_constants);

        let dynamic_states: Vec<vk::DynamicState> = state
            .dynamic_states
            .iter()
            .copied()
            .map(dynamic_state_to_vk)
            .collect();
        let dynamic_state = vk::PipelineDynamicStateCreateInfo::default()
            .dynamic_states(&dynamic_states);

        let pipeline_create_info = vk::GraphicsPipelineCreateInfo::default()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .depth_stencil_state(&depth_stencil_state)
            .multisample_state(&multisample_state)
            .color_blend_state(&color_blend_state)
            .dynamic_state(&dynamic_state)
            .layout(vk::PipelineLayout::from_raw(desc.layout.as_raw()))
            .render_pass(vk::RenderPass::from_raw(desc.render_pass.as_raw()))
            .subpass(desc.subpass);

        let pipelines = unsafe {
            self.device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                std::slice::from_ref(&pipeline_create_info),
                None,
            )
        }
        .map_err(|e| vk_result_to_error("create graphics pipeline", e.1))?;

        match pipelines.first() {
            Some(pipeline) => {
                engine_debug!("flounder::vulkan", "Graphics pipeline created ({} color attachments, {} stages)",
                    color_blend_attachments.len(), shader_stages.len());
                Ok(PipelineHandle::from_raw(pipeline.as_raw()))
            }
            None => engine_bail!("flounder::vulkan", "Graphics pipeline creation returned no pipeline"),
        }
    }

    fn destroy_pipeline(&mut self, pipeline: PipelineHandle) {
        unsafe {
            self.device
                .destroy_pipeline(vk::Pipeline::from_raw(pipeline.as_raw()), None);
        }
    }
}
