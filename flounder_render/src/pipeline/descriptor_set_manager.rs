/// Descriptor set manager
///
/// Owns the descriptor-set layout built from a binding list, a pool sized for
/// exactly one set of that layout, and the set itself.

use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_trace};
use crate::graphics_device::{
    DescriptorBinding, DescriptorPoolDesc, DescriptorPoolHandle, DescriptorPoolSize,
    DescriptorResource, DescriptorSetHandle, DescriptorSetLayoutHandle, DescriptorWrite,
    GraphicsDevice,
};

pub struct DescriptorSetManager {
    bindings: Vec<DescriptorBinding>,
    layout: DescriptorSetLayoutHandle,
    pool: DescriptorPoolHandle,
    set: DescriptorSetHandle,
}

impl DescriptorSetManager {
    /// Store the binding list; no native work
    pub fn new(bindings: Vec<DescriptorBinding>) -> Self {
        Self {
            bindings,
            layout: DescriptorSetLayoutHandle::NULL,
            pool: DescriptorPoolHandle::NULL,
            set: DescriptorSetHandle::NULL,
        }
    }

    /// Reject duplicate slots and bindings visible to no stage
    pub fn validate_bindings(bindings: &[DescriptorBinding]) -> Result<()> {
        let mut slots = FxHashSet::default();
        for binding in bindings {
            if !slots.insert(binding.slot) {
                engine_bail!("flounder::DescriptorSetManager", InvalidConfiguration,
                    "Descriptor slot {} declared twice", binding.slot);
            }
            if binding.stages.is_empty() {
                engine_bail!("flounder::DescriptorSetManager", InvalidConfiguration,
                    "Descriptor slot {} has an empty stage mask", binding.slot);
            }
        }
        Ok(())
    }

    /// One pool size per distinct kind, in first-appearance order
    ///
    /// `count` is the number of bindings of that kind, so the pool holds
    /// exactly one set of the layout.
    pub fn pool_sizes(bindings: &[DescriptorBinding]) -> Vec<DescriptorPoolSize> {
        let mut sizes: Vec<DescriptorPoolSize> = Vec::new();
        for binding in bindings {
            match sizes.iter_mut().find(|s| s.kind == binding.kind) {
                Some(size) => size.count += 1,
                None => sizes.push(DescriptorPoolSize { kind: binding.kind, count: 1 }),
            }
        }
        sizes
    }

    /// Pool descriptor for a single set of `bindings`
    pub fn pool_desc(bindings: &[DescriptorBinding]) -> DescriptorPoolDesc {
        DescriptorPoolDesc {
            max_sets: 1,
            sizes: Self::pool_sizes(bindings),
        }
    }

    /// Build layout, pool and set
    ///
    /// On failure everything this call created is released before the error
    /// is returned.
    pub fn create(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.has_native_objects() {
            engine_bail!("flounder::DescriptorSetManager", InvalidUsage,
                "Descriptor set already created");
        }
        Self::validate_bindings(&self.bindings)?;

        engine_trace!("flounder::DescriptorSetManager",
            "Creating descriptor set layout ({} bindings)", self.bindings.len());
        let layout = device.create_descriptor_set_layout(&self.bindings)?;

        let pool = match device.create_descriptor_pool(&Self::pool_desc(&self.bindings)) {
            Ok(pool) => pool,
            Err(e) => {
                engine_debug!("flounder::DescriptorSetManager", "Pool creation failed, releasing layout: {}", e);
                device.destroy_descriptor_set_layout(layout);
                return Err(e);
            }
        };

        let set = match device.allocate_descriptor_set(pool, layout) {
            Ok(set) => set,
            Err(e) => {
                engine_debug!("flounder::DescriptorSetManager", "Set allocation failed, releasing pool and layout: {}", e);
                device.destroy_descriptor_pool(pool);
                device.destroy_descriptor_set_layout(layout);
                return Err(e);
            }
        };

        self.layout = layout;
        self.pool = pool;
        self.set = set;
        Ok(())
    }

    /// Write `resource` into `slot`
    ///
    /// May be repeated; the caller must make sure no in-flight frame still
    /// reads the previous binding.
    pub fn bind_resource(
        &mut self,
        device: &mut dyn GraphicsDevice,
        slot: u32,
        resource: DescriptorResource,
    ) -> Result<()> {
        if self.set.is_null() {
            engine_bail!("flounder::DescriptorSetManager", InvalidUsage,
                "Cannot bind slot {}: descriptor set not allocated", slot);
        }
        let Some(binding) = self.bindings.iter().find(|b| b.slot == slot) else {
            engine_bail!("flounder::DescriptorSetManager", InvalidUsage,
                "Slot {} is not part of the descriptor set layout", slot);
        };
        if binding.kind != resource.kind() {
            engine_bail!("flounder::DescriptorSetManager", InvalidUsage,
                "Slot {} expects {:?}, got {:?}", slot, binding.kind, resource.kind());
        }

        device.write_descriptor_set(self.set, &[DescriptorWrite { slot, resource }])
    }

    /// Release pool (and its set) then layout. Idempotent.
    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if !self.pool.is_null() {
            device.destroy_descriptor_pool(self.pool);
        }
        if !self.layout.is_null() {
            device.destroy_descriptor_set_layout(self.layout);
        }
        self.pool = DescriptorPoolHandle::NULL;
        self.set = DescriptorSetHandle::NULL;
        self.layout = DescriptorSetLayoutHandle::NULL;
    }

    pub fn bindings(&self) -> &[DescriptorBinding] {
        &self.bindings
    }

    pub fn layout(&self) -> DescriptorSetLayoutHandle {
        self.layout
    }

    pub fn pool(&self) -> DescriptorPoolHandle {
        self.pool
    }

    pub fn set(&self) -> DescriptorSetHandle {
        self.set
    }

    pub fn is_created(&self) -> bool {
        !self.set.is_null()
    }

    fn has_native_objects(&self) -> bool {
        !self.layout.is_null() || !self.pool.is_null() || !self.set.is_null()
    }
}

#[cfg(test)]
#[path = "descriptor_set_manager_tests.rs"]
mod tests;
