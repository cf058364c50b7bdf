/// Pipeline - owns every native object one draw batch binds
///
/// Lifecycle: `new` stores configuration only, `create` builds descriptor
/// layout → pool → set → pipeline layout → pipeline, `cleanup` (or drop)
/// releases them in reverse order.
///
/// Dropping a pipeline locks its device: the caller's thread must not hold
/// the device lock at that point, or the drop deadlocks.

use std::sync::{Arc, Mutex};
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_err, engine_info, engine_trace};
use crate::graphics_device::{
    DescriptorBinding, DescriptorPoolHandle, DescriptorResource, DescriptorSetHandle,
    DescriptorSetLayoutHandle, GraphicsDevice, PipelineHandle, PipelineLayoutHandle,
    PipelineStateBundle, ShaderProgram, VertexInputDescription,
};
use crate::pipeline::{DescriptorSetManager, PipelineConfig, PipelineVariantBuilder, RenderMode};

/// Must not be dropped while the caller holds the device lock
pub struct Pipeline {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    name: String,
    mode: RenderMode,
    /// Not owned: the shader modules outlive the pipeline
    shader: Arc<ShaderProgram>,
    vertex_input: VertexInputDescription,
    config: PipelineConfig,
    descriptors: DescriptorSetManager,
    state: Option<PipelineStateBundle>,
    pipeline_layout: PipelineLayoutHandle,
    pipeline: PipelineHandle,
}

impl Pipeline {
    /// Store configuration; no GPU work
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        name: impl Into<String>,
        mode: RenderMode,
        shader: Arc<ShaderProgram>,
        descriptor_bindings: Vec<DescriptorBinding>,
        vertex_input: VertexInputDescription,
        config: PipelineConfig,
    ) -> Self {
        Self {
            device,
            name: name.into(),
            mode,
            shader,
            vertex_input,
            config,
            descriptors: DescriptorSetManager::new(descriptor_bindings),
            state: None,
            pipeline_layout: PipelineLayoutHandle::NULL,
            pipeline: PipelineHandle::NULL,
        }
    }

    /// Build every native object
    ///
    /// Configuration is fully checked before the first native call. If a
    /// native call fails, everything already created is released before the
    /// error is returned. Calling `create` again before `cleanup` is an error.
    pub fn create(&mut self) -> Result<()> {
        if self.is_created() {
            engine_bail!("flounder::Pipeline", InvalidUsage,
                "Pipeline '{}' is already created", self.name);
        }

        engine_trace!("flounder::Pipeline", "Validating pipeline '{}' ({})", self.name, self.mode);
        self.validate()?;

        let device = Arc::clone(&self.device);
        let mut device = device.lock().map_err(|_| {
            engine_err!("flounder::Pipeline", "Graphics device lock poisoned while creating '{}'", self.name)
        })?;

        match self.build(&mut *device) {
            Ok(()) => {
                engine_info!("flounder::Pipeline", "Pipeline '{}' created ({}, {} descriptor bindings)",
                    self.name, self.mode, self.descriptors.bindings().len());
                Ok(())
            }
            Err(err) => {
                // The failing call already logged at ERROR
                engine_debug!("flounder::Pipeline", "Pipeline '{}' rolled back: {}", self.name, err);
                self.release(&mut *device);
                Err(err)
            }
        }
    }

    /// Release pipeline, pipeline layout, descriptor pool and descriptor set
    /// layout, in that order
    ///
    /// No-op on a never-created or already cleaned pipeline. Locks the
    /// device, so it must not be called while the device lock is held.
    pub fn cleanup(&mut self) {
        if !self.has_native_objects() {
            return;
        }

        let device = Arc::clone(&self.device);
        let mut device = match device.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.release(&mut *device);

        engine_debug!("flounder::Pipeline", "Pipeline '{}' cleaned up", self.name);
    }

    /// Write a resource into a descriptor slot of this pipeline's set
    pub fn bind_resource(&mut self, slot: u32, resource: DescriptorResource) -> Result<()> {
        let device = Arc::clone(&self.device);
        let mut device = device.lock().map_err(|_| {
            engine_err!("flounder::Pipeline", "Graphics device lock poisoned while binding slot {}", slot)
        })?;
        self.descriptors.bind_resource(&mut *device, slot, resource)
    }

    // ===== ACCESSORS =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn shader(&self) -> &Arc<ShaderProgram> {
        &self.shader
    }

    pub fn vertex_input(&self) -> &VertexInputDescription {
        &self.vertex_input
    }

    pub fn descriptor_bindings(&self) -> &[DescriptorBinding] {
        self.descriptors.bindings()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn descriptor_set_layout(&self) -> DescriptorSetLayoutHandle {
        self.descriptors.layout()
    }

    pub fn descriptor_pool(&self) -> DescriptorPoolHandle {
        self.descriptors.pool()
    }

    pub fn descriptor_set(&self) -> DescriptorSetHandle {
        self.descriptors.set()
    }

    pub fn pipeline_layout(&self) -> PipelineLayoutHandle {
        self.pipeline_layout
    }

    pub fn pipeline(&self) -> PipelineHandle {
        self.pipeline
    }

    /// State bundle the pipeline was built with (None before `create`)
    pub fn state_bundle(&self) -> Option<&PipelineStateBundle> {
        self.state.as_ref()
    }

    pub fn is_created(&self) -> bool {
        !self.pipeline.is_null()
    }

    // ===== INTERNAL =====

    fn variant_builder(&self) -> PipelineVariantBuilder<'_> {
        PipelineVariantBuilder::new(
            self.mode,
            &self.shader,
            &self.vertex_input,
            self.descriptors.bindings(),
            &self.config,
        )
    }

    fn validate(&self) -> Result<()> {
        self.variant_builder().validate()?;
        DescriptorSetManager::validate_bindings(self.descriptors.bindings())
    }

    fn build(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        engine_trace!("flounder::Pipeline", "'{}': descriptor set layout, pool and set", self.name);
        self.descriptors.create(device)?;

        let builder = PipelineVariantBuilder::new(
            self.mode,
            &self.shader,
            &self.vertex_input,
            self.descriptors.bindings(),
            &self.config,
        );

        engine_trace!("flounder::Pipeline", "'{}': pipeline layout", self.name);
        self.pipeline_layout = builder.create_pipeline_layout(device, self.descriptors.layout())?;

        engine_trace!("flounder::Pipeline", "'{}': {} state bundle and pipeline", self.name, self.mode);
        let state = builder.state_bundle()?;
        self.pipeline = builder.create_pipeline(device, &state, self.pipeline_layout)?;
        self.state = Some(state);
        Ok(())
    }

    fn release(&mut self, device: &mut dyn GraphicsDevice) {
        if !self.pipeline.is_null() {
            device.destroy_pipeline(self.pipeline);
            self.pipeline = PipelineHandle::NULL;
        }
        if !self.pipeline_layout.is_null() {
            device.destroy_pipeline_layout(self.pipeline_layout);
            self.pipeline_layout = PipelineLayoutHandle::NULL;
        }
        self.descriptors.destroy(device);
        self.state = None;
    }

    fn has_native_objects(&self) -> bool {
        !self.pipeline.is_null()
            || !self.pipeline_layout.is_null()
            || !self.descriptors.layout().is_null()
            || !self.descriptors.pool().is_null()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
