//! Live-handle registry
//!
//! Insertion-ordered set of every live [`EffectHandle`], one per record.
//! Bulk teardown destroys the records' resources itself and suppresses
//! individual removal while it runs, so nothing mutates the list behind
//! the iteration.

use dfx_core::engine::GfxEngine;
use dfx_core::lifecycle;

use crate::handle::{EffectHandle, EffectId};
use crate::model::{ModelInfo, SharedEffect};

pub struct EffectRegistry {
    handles: Vec<EffectHandle>,
    next_id: u64,
    can_remove: bool,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            next_id: 1,
            can_remove: true,
        }
    }

    /// Wrap `record` in a new handle and track it
    pub fn register(&mut self, model: u32, record: SharedEffect) -> EffectHandle {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        let handle = EffectHandle::new(id, model, record);
        self.handles.push(handle.clone());
        handle
    }

    /// Drop `handle` from the registry
    ///
    /// Silently ignored while a bulk teardown is running.
    pub fn remove(&mut self, handle: &EffectHandle) {
        if !self.can_remove {
            return;
        }
        self.handles.retain(|other| other.id() != handle.id());
    }

    pub fn get(&self, id: EffectId) -> Option<EffectHandle> {
        self.handles
            .iter()
            .find(|handle| handle.id() == id)
            .cloned()
    }

    /// The handle bound to `record`, by record identity
    pub fn find(&self, record: &SharedEffect) -> Option<EffectHandle> {
        self.handles
            .iter()
            .find(|handle| handle.binds(record))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectHandle> {
        self.handles.iter()
    }

    /// Destroy every handle and its record's resources
    pub fn remove_all(&mut self, engine: &mut dyn GfxEngine) {
        self.can_remove = false;
        for handle in &self.handles {
            lifecycle::shutdown_resources(engine, &mut handle.record().write());
        }
        self.handles.clear();
        self.can_remove = true;
    }

    /// Remove and destroy handles owned by `model`
    ///
    /// With an index, only the handle bound to the record at that slot
    /// in the model's storage; without, every handle of that model.
    pub fn remove_by_owner(
        &mut self,
        engine: &mut dyn GfxEngine,
        info: &mut dyn ModelInfo,
        model: u32,
        index: Option<u32>,
    ) -> bool {
        match index {
            Some(index) => {
                let Some(record) = info.effect_at(index) else {
                    return false;
                };
                let Some(handle) = self.find(&record) else {
                    return false;
                };
                handle.destroy(info);
                lifecycle::shutdown_resources(engine, &mut record.write());
                self.remove(&handle);
                true
            }
            None => {
                let owned: Vec<EffectHandle> = self
                    .handles
                    .iter()
                    .filter(|handle| handle.model() == model)
                    .cloned()
                    .collect();
                for handle in &owned {
                    handle.destroy(info);
                    lifecycle::shutdown_resources(engine, &mut handle.record().write());
                    self.remove(handle);
                }
                !owned.is_empty()
            }
        }
    }
}
