/// Mock graphics device for unit tests (no GPU required)
///
/// Tracks every live native object, enforces descriptor pool capacity the way
/// a real driver does, records each call, and can be told to fail a given
/// operation.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::error::{Error, Result};
use crate::graphics_device::{
    DescriptorBinding, DescriptorPoolDesc, DescriptorPoolHandle, DescriptorPoolSize,
    DescriptorSetHandle, DescriptorSetLayoutHandle, DescriptorWrite, GraphicsDevice,
    GraphicsPipelineDesc, PipelineHandle, PipelineLayoutHandle, PipelineStateBundle,
    PushConstantRange,
};

new_key_type! {
    struct MockObjectKey;
}

fn key_of(raw: u64) -> MockObjectKey {
    KeyData::from_ffi(raw).into()
}

fn raw_of(key: MockObjectKey) -> u64 {
    key.data().as_ffi()
}

#[derive(Debug, Clone)]
enum MockObject {
    SetLayout {
        bindings: Vec<DescriptorBinding>,
    },
    Pool {
        max_sets: u32,
        remaining: Vec<DescriptorPoolSize>,
        sets: Vec<MockObjectKey>,
    },
    Set {
        layout: MockObjectKey,
        writes: Vec<DescriptorWrite>,
    },
    PipelineLayout {
        set_layouts: Vec<DescriptorSetLayoutHandle>,
        push_constant_ranges: Vec<PushConstantRange>,
    },
    Pipeline {
        layout: PipelineLayoutHandle,
        state: PipelineStateBundle,
    },
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    CreateDescriptorSetLayout,
    CreateDescriptorPool,
    AllocateDescriptorSet,
    WriteDescriptorSet,
    CreatePipelineLayout,
    CreateGraphicsPipeline,
}

/// In-memory GraphicsDevice
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    objects: SlotMap<MockObjectKey, MockObject>,
    failures: FxHashMap<MockOperation, Error>,
    /// Every call, in order (e.g. "create_descriptor_pool")
    pub calls: Vec<String>,
    /// Destroy calls on a stale, null or wrong-kind handle
    pub invalid_destroys: u32,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `op` return `error`
    pub fn fail_on(&mut self, op: MockOperation, error: Error) {
        self.failures.insert(op, error);
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Number of calls that create or allocate a native object
    pub fn creation_call_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.starts_with("create_") || c.starts_with("allocate_"))
            .count()
    }

    /// Total live objects of every kind
    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn live_set_layouts(&self) -> usize {
        self.count(|o| matches!(o, MockObject::SetLayout { .. }))
    }

    pub fn live_pools(&self) -> usize {
        self.count(|o| matches!(o, MockObject::Pool { .. }))
    }

    pub fn live_sets(&self) -> usize {
        self.count(|o| matches!(o, MockObject::Set { .. }))
    }

    pub fn live_pipeline_layouts(&self) -> usize {
        self.count(|o| matches!(o, MockObject::PipelineLayout { .. }))
    }

    pub fn live_pipelines(&self) -> usize {
        self.count(|o| matches!(o, MockObject::Pipeline { .. }))
    }

    /// Binding list a live set layout was created with
    pub fn set_layout_bindings(&self, layout: DescriptorSetLayoutHandle) -> Option<&[DescriptorBinding]> {
        match self.objects.get(key_of(layout.as_raw())) {
            Some(MockObject::SetLayout { bindings }) => Some(bindings),
            _ => None,
        }
    }

    /// Resources currently written into a live set
    pub fn set_writes(&self, set: DescriptorSetHandle) -> Option<&[DescriptorWrite]> {
        match self.objects.get(key_of(set.as_raw())) {
            Some(MockObject::Set { writes, .. }) => Some(writes),
            _ => None,
        }
    }

    /// Set layouts and push constants of a live pipeline layout
    pub fn pipeline_layout_contents(
        &self,
        layout: PipelineLayoutHandle,
    ) -> Option<(&[DescriptorSetLayoutHandle], &[PushConstantRange])> {
        match self.objects.get(key_of(layout.as_raw())) {
            Some(MockObject::PipelineLayout { set_layouts, push_constant_ranges }) => {
                Some((set_layouts, push_constant_ranges))
            }
            _ => None,
        }
    }

    /// Fixed-function state a live pipeline was created with
    pub fn pipeline_state(&self, pipeline: PipelineHandle) -> Option<&PipelineStateBundle> {
        match self.objects.get(key_of(pipeline.as_raw())) {
            Some(MockObject::Pipeline { state, .. }) => Some(state),
            _ => None,
        }
    }

    /// Layout a live pipeline was created against
    pub fn pipeline_layout_of(&self, pipeline: PipelineHandle) -> Option<PipelineLayoutHandle> {
        match self.objects.get(key_of(pipeline.as_raw())) {
            Some(MockObject::Pipeline { layout, .. }) => Some(*layout),
            _ => None,
        }
    }

    fn count(&self, pred: impl Fn(&MockObject) -> bool) -> usize {
        self.objects.values().filter(|&o| pred(o)).count()
    }

    fn begin(&mut self, call: &str, op: Option<MockOperation>) -> Result<()> {
        self.calls.push(call.to_string());
        match op.and_then(|op| self.failures.get(&op)) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn is_live(&self, raw: u64, pred: impl Fn(&MockObject) -> bool) -> bool {
        raw != 0 && self.objects.get(key_of(raw)).map_or(false, pred)
    }

    fn destroy(&mut self, call: &str, raw: u64, pred: impl Fn(&MockObject) -> bool) -> Option<MockObject> {
        self.calls.push(call.to_string());
        if !self.is_live(raw, pred) {
            self.invalid_destroys += 1;
            return None;
        }
        self.objects.remove(key_of(raw))
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_descriptor_set_layout(
        &mut self,
        bindings: &[DescriptorBinding],
    ) -> Result<DescriptorSetLayoutHandle> {
        self.begin("create_descriptor_set_layout", Some(MockOperation::CreateDescriptorSetLayout))?;
        let key = self.objects.insert(MockObject::SetLayout { bindings: bindings.to_vec() });
        Ok(DescriptorSetLayoutHandle::from_raw(raw_of(key)))
    }

    fn destroy_descriptor_set_layout(&mut self, layout: DescriptorSetLayoutHandle) {
        self.destroy("destroy_descriptor_set_layout", layout.as_raw(), |o| {
            matches!(o, MockObject::SetLayout { .. })
        });
    }

    fn create_descriptor_pool(&mut self, desc: &DescriptorPoolDesc) -> Result<DescriptorPoolHandle> {
        self.begin("create_descriptor_pool", Some(MockOperation::CreateDescriptorPool))?;
        if desc.max_sets == 0 {
            return Err(Error::BackendError("descriptor pool max_sets must be > 0".to_string()));
        }
        let key = self.objects.insert(MockObject::Pool {
            max_sets: desc.max_sets,
            remaining: desc.sizes.clone(),
            sets: Vec::new(),
        });
        Ok(DescriptorPoolHandle::from_raw(raw_of(key)))
    }

    fn destroy_descriptor_pool(&mut self, pool: DescriptorPoolHandle) {
        let removed = self.destroy("destroy_descriptor_pool", pool.as_raw(), |o| {
            matches!(o, MockObject::Pool { .. })
        });
        if let Some(MockObject::Pool { sets, .. }) = removed {
            for set in sets {
                self.objects.remove(set);
            }
        }
    }

    fn allocate_descriptor_set(
        &mut self,
        pool: DescriptorPoolHandle,
        layout: DescriptorSetLayoutHandle,
    ) -> Result<DescriptorSetHandle> {
        self.begin("allocate_descriptor_set", Some(MockOperation::AllocateDescriptorSet))?;

        let layout_key = key_of(layout.as_raw());
        let bindings = match self.objects.get(layout_key) {
            Some(MockObject::SetLayout { bindings }) if !layout.is_null() => bindings.clone(),
            _ => return Err(Error::BackendError("unknown descriptor set layout".to_string())),
        };

        let pool_key = key_of(pool.as_raw());
        let Some(MockObject::Pool { max_sets, remaining, sets }) = self.objects.get_mut(pool_key) else {
            return Err(Error::BackendError("unknown descriptor pool".to_string()));
        };
        if sets.len() as u32 >= *max_sets {
            return Err(Error::DescriptorPoolExhausted);
        }

        let mut after = remaining.clone();
        for binding in &bindings {
            match after.iter_mut().find(|s| s.kind == binding.kind && s.count > 0) {
                Some(size) => size.count -= 1,
                None => return Err(Error::DescriptorPoolExhausted),
            }
        }
        *remaining = after;

        let set_key = self.objects.insert(MockObject::Set { layout: layout_key, writes: Vec::new() });
        if let Some(MockObject::Pool { sets, .. }) = self.objects.get_mut(pool_key) {
            sets.push(set_key);
        }
        Ok(DescriptorSetHandle::from_raw(raw_of(set_key)))
    }

    fn write_descriptor_set(
        &mut self,
        set: DescriptorSetHandle,
        writes: &[DescriptorWrite],
    ) -> Result<()> {
        self.begin("write_descriptor_set", Some(MockOperation::WriteDescriptorSet))?;

        let layout_key = match self.objects.get(key_of(set.as_raw())) {
            Some(MockObject::Set { layout, .. }) if !set.is_null() => *layout,
            _ => return Err(Error::BackendError("unknown descriptor set".to_string())),
        };
        let bindings = match self.objects.get(layout_key) {
            Some(MockObject::SetLayout { bindings }) => bindings.clone(),
            _ => return Err(Error::BackendError("descriptor set layout destroyed".to_string())),
        };
        for write in writes {
            let matches_layout = bindings
                .iter()
                .any(|b| b.slot == write.slot && b.kind == write.resource.kind());
            if !matches_layout {
                return Err(Error::BackendError(format!("write to slot {} does not match the layout", write.slot)));
            }
        }

        if let Some(MockObject::Set { writes: current, .. }) = self.objects.get_mut(key_of(set.as_raw())) {
            for write in writes {
                current.retain(|w| w.slot != write.slot);
                current.push(*write);
            }
        }
        Ok(())
    }

    fn create_pipeline_layout(
        &mut self,
        set_layouts: &[DescriptorSetLayoutHandle],
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<PipelineLayoutHandle> {
        self.begin("create_pipeline_layout", Some(MockOperation::CreatePipelineLayout))?;
        for layout in set_layouts {
            if !self.is_live(layout.as_raw(), |o| matches!(o, MockObject::SetLayout { .. })) {
                return Err(Error::BackendError("unknown descriptor set layout".to_string()));
            }
        }
        let key = self.objects.insert(MockObject::PipelineLayout {
            set_layouts: set_layouts.to_vec(),
            push_constant_ranges: push_constant_ranges.to_vec(),
        });
        Ok(PipelineLayoutHandle::from_raw(raw_of(key)))
    }

    fn destroy_pipeline_layout(&mut self, layout: PipelineLayoutHandle) {
        self.destroy("destroy_pipeline_layout", layout.as_raw(), |o| {
            matches!(o, MockObject::PipelineLayout { .. })
        });
    }

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc<'_>) -> Result<PipelineHandle> {
        self.begin("create_graphics_pipeline", Some(MockOperation::CreateGraphicsPipeline))?;
        if !self.is_live(desc.layout.as_raw(), |o| matches!(o, MockObject::PipelineLayout { .. })) {
            return Err(Error::BackendError("unknown pipeline layout".to_string()));
        }
        let key = self.objects.insert(MockObject::Pipeline {
            layout: desc.layout,
            state: desc.state.clone(),
        });
        Ok(PipelineHandle::from_raw(raw_of(key)))
    }

    fn destroy_pipeline(&mut self, pipeline: PipelineHandle) {
        self.destroy("destroy_pipeline", pipeline.as_raw(), |o| {
            matches!(o, MockObject::Pipeline { .. })
        });
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
