//! Owning-model surface
//!
//! Effect records live in per-model storage owned outside this crate.
//! [`ModelInfo`] is the contract that storage fulfils; [`GameModels`]
//! resolves model ids to it and answers the model-validity predicates
//! the scripting surface checks before touching anything.

use std::sync::Arc;

use dfx_core::engine::GfxEngine;
use dfx_core::kind::EffectKind;
use dfx_core::record::EffectRecord;
use glam::Vec3;
use parking_lot::RwLock;

/// A record shared between its owning model and any live handle
pub type SharedEffect = Arc<RwLock<EffectRecord>>;

/// One model's effect storage
///
/// Effects present when the model was loaded are its default effects;
/// effects added afterwards are custom. The store keeps a pre-edit
/// snapshot per default effect so edits can be reverted.
pub trait ModelInfo {
    /// Append a custom effect, `None` if storage refuses the allocation
    fn add_effect(&mut self, position: Vec3, kind: EffectKind) -> Option<SharedEffect>;

    /// Detach `record` from the model without touching its resources
    fn remove_effect(&mut self, record: &SharedEffect) -> bool;

    /// Remove and destroy the effect at `index`
    ///
    /// Default effects are skipped unless `include_default`.
    fn remove_effect_at(&mut self, engine: &mut dyn GfxEngine, index: u32, include_default: bool)
        -> bool;

    /// Remove and destroy every effect, subject to `include_default`
    ///
    /// True if at least one effect was removed.
    fn remove_all_effects(&mut self, engine: &mut dyn GfxEngine, include_default: bool) -> bool;

    fn effect_count(&self) -> u32;

    fn effect_at(&self, index: u32) -> Option<SharedEffect>;

    /// Snapshot `record` so a later reset can restore it
    ///
    /// Only the first snapshot per record sticks; the point is the
    /// pre-edit state, not the latest one.
    fn store_default_effect(&mut self, engine: &mut dyn GfxEngine, record: &SharedEffect);

    /// Restore every snapshotted effect; drop custom ones if asked
    fn reset_effects(&mut self, engine: &mut dyn GfxEngine, remove_custom: bool) -> bool;
}

/// Model-id resolution and validity predicates
pub trait GameModels {
    fn model_info(&mut self, model: u32) -> Option<&mut dyn ModelInfo>;

    fn is_valid_object(&self, model: u32) -> bool;
    fn is_valid_building(&self, model: u32) -> bool;
    fn is_valid_vehicle(&self, model: u32) -> bool;
}

/// True if `model` is any kind of model the scripting surface accepts
pub fn is_known_model(models: &dyn GameModels, model: u32) -> bool {
    models.is_valid_object(model)
        || models.is_valid_building(model)
        || models.is_valid_vehicle(model)
}

// ============================================================================
// Mock model store
// ============================================================================

#[cfg(any(test, feature = "mock"))]
pub use self::mock::{MockModelInfo, MockModels};

#[cfg(any(test, feature = "mock"))]
mod mock {
    use super::*;
    use dfx_core::lifecycle;
    use std::collections::HashMap;

    struct Slot {
        record: SharedEffect,
        is_custom: bool,
        snapshot: Option<EffectRecord>,
    }

    /// In-memory [`ModelInfo`] for tests
    #[derive(Default)]
    pub struct MockModelInfo {
        slots: Vec<Slot>,
        /// Refuse further [`ModelInfo::add_effect`] calls
        pub deny_add: bool,
    }

    impl MockModelInfo {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a default effect, as if it came from the model file
        pub fn seed_default(&mut self, position: Vec3, kind: EffectKind) -> SharedEffect {
            let record = Arc::new(RwLock::new(EffectRecord::new(position, kind)));
            self.slots.push(Slot {
                record: Arc::clone(&record),
                is_custom: false,
                snapshot: None,
            });
            record
        }

        fn slot_of(&mut self, record: &SharedEffect) -> Option<&mut Slot> {
            self.slots
                .iter_mut()
                .find(|slot| Arc::ptr_eq(&slot.record, record))
        }
    }

    impl ModelInfo for MockModelInfo {
        fn add_effect(&mut self, position: Vec3, kind: EffectKind) -> Option<SharedEffect> {
            if self.deny_add {
                return None;
            }
            let record = Arc::new(RwLock::new(EffectRecord::new(position, kind)));
            self.slots.push(Slot {
                record: Arc::clone(&record),
                is_custom: true,
                snapshot: None,
            });
            Some(record)
        }

        fn remove_effect(&mut self, record: &SharedEffect) -> bool {
            let before = self.slots.len();
            self.slots.retain(|slot| !Arc::ptr_eq(&slot.record, record));
            self.slots.len() != before
        }

        fn remove_effect_at(
            &mut self,
            engine: &mut dyn GfxEngine,
            index: u32,
            include_default: bool,
        ) -> bool {
            let index = index as usize;
            if index >= self.slots.len() {
                return false;
            }
            if !self.slots[index].is_custom && !include_default {
                return false;
            }
            let slot = self.slots.remove(index);
            lifecycle::shutdown_resources(engine, &mut slot.record.write());
            true
        }

        fn remove_all_effects(&mut self, engine: &mut dyn GfxEngine, include_default: bool) -> bool {
            let mut kept = Vec::new();
            let mut removed = false;
            for slot in self.slots.drain(..) {
                if slot.is_custom || include_default {
                    lifecycle::shutdown_resources(engine, &mut slot.record.write());
                    removed = true;
                } else {
                    kept.push(slot);
                }
            }
            self.slots = kept;
            removed
        }

        fn effect_count(&self) -> u32 {
            self.slots.len() as u32
        }

        fn effect_at(&self, index: u32) -> Option<SharedEffect> {
            self.slots
                .get(index as usize)
                .map(|slot| Arc::clone(&slot.record))
        }

        fn store_default_effect(&mut self, engine: &mut dyn GfxEngine, record: &SharedEffect) {
            let Some(slot) = self.slot_of(record) else {
                return;
            };
            if slot.snapshot.is_some() {
                return;
            }
            let copy = lifecycle::clone_record(engine, &slot.record.read());
            slot.snapshot = Some(copy);
        }

        fn reset_effects(&mut self, engine: &mut dyn GfxEngine, remove_custom: bool) -> bool {
            let mut kept = Vec::new();
            for mut slot in self.slots.drain(..) {
                if slot.is_custom && remove_custom {
                    lifecycle::shutdown_resources(engine, &mut slot.record.write());
                    continue;
                }
                if let Some(snapshot) = slot.snapshot.take() {
                    let restored = lifecycle::clone_record(engine, &snapshot);
                    lifecycle::destroy_record(engine, snapshot);
                    let mut record = slot.record.write();
                    lifecycle::shutdown_resources(engine, &mut record);
                    *record = restored;
                }
                kept.push(slot);
            }
            self.slots = kept;
            true
        }
    }

    /// In-memory [`GameModels`] for tests
    #[derive(Default)]
    pub struct MockModels {
        infos: HashMap<u32, MockModelInfo>,
        objects: Vec<u32>,
        buildings: Vec<u32>,
        vehicles: Vec<u32>,
    }

    impl MockModels {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register `model` as a valid object model with empty storage
        pub fn add_object(&mut self, model: u32) -> &mut MockModelInfo {
            self.objects.push(model);
            self.infos.entry(model).or_default()
        }

        pub fn add_building(&mut self, model: u32) -> &mut MockModelInfo {
            self.buildings.push(model);
            self.infos.entry(model).or_default()
        }

        pub fn add_vehicle(&mut self, model: u32) -> &mut MockModelInfo {
            self.vehicles.push(model);
            self.infos.entry(model).or_default()
        }

        /// A valid model id with no info behind it
        pub fn add_object_without_info(&mut self, model: u32) {
            self.objects.push(model);
        }

        pub fn info(&mut self, model: u32) -> Option<&mut MockModelInfo> {
            self.infos.get_mut(&model)
        }
    }

    impl GameModels for MockModels {
        fn model_info(&mut self, model: u32) -> Option<&mut dyn ModelInfo> {
            self.infos
                .get_mut(&model)
                .map(|info| info as &mut dyn ModelInfo)
        }

        fn is_valid_object(&self, model: u32) -> bool {
            self.objects.contains(&model)
        }

        fn is_valid_building(&self, model: u32) -> bool {
            self.buildings.contains(&model)
        }

        fn is_valid_vehicle(&self, model: u32) -> bool {
            self.vehicles.contains(&model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfx_core::mock::MockEngine;

    #[test]
    fn test_default_effects_survive_unless_included() {
        let mut engine = MockEngine::new();
        let mut info = MockModelInfo::new();
        info.seed_default(Vec3::ZERO, EffectKind::Light);
        info.add_effect(Vec3::ONE, EffectKind::Particle);

        assert!(!info.remove_effect_at(&mut engine, 0, false));
        assert_eq!(info.effect_count(), 2);
        assert!(info.remove_effect_at(&mut engine, 0, true));
        assert_eq!(info.effect_count(), 1);

        info.seed_default(Vec3::ZERO, EffectKind::Light);
        assert!(info.remove_all_effects(&mut engine, false));
        assert_eq!(info.effect_count(), 1);
        assert!(info.remove_all_effects(&mut engine, true));
        assert_eq!(info.effect_count(), 0);
        assert!(!info.remove_all_effects(&mut engine, true));
    }

    #[test]
    fn test_snapshot_and_reset() {
        let mut engine = MockEngine::new();
        let mut info = MockModelInfo::new();
        let record = info.seed_default(Vec3::ZERO, EffectKind::Light);

        info.store_default_effect(&mut engine, &record);
        {
            let mut guard = record.write();
            guard.as_light_mut().unwrap().corona_size = 9.0;
            // a second snapshot must not overwrite the pre-edit one
        }
        info.store_default_effect(&mut engine, &record);

        assert!(info.reset_effects(&mut engine, false));
        assert_eq!(record.read().as_light().unwrap().corona_size, 0.0);
    }

    #[test]
    fn test_reset_drops_custom_effects() {
        let mut engine = MockEngine::new();
        let mut info = MockModelInfo::new();
        info.seed_default(Vec3::ZERO, EffectKind::Light);
        info.add_effect(Vec3::ONE, EffectKind::Particle);

        assert!(info.reset_effects(&mut engine, true));
        assert_eq!(info.effect_count(), 1);
        assert_eq!(
            info.effect_at(0).map(|record| record.read().kind()),
            Some(EffectKind::Light)
        );
    }

    #[test]
    fn test_remove_effect_detaches_without_teardown() {
        let mut info = MockModelInfo::new();
        let record = info.add_effect(Vec3::ZERO, EffectKind::Roadsign).unwrap();
        assert!(info.remove_effect(&record));
        assert!(!info.remove_effect(&record));
        // the record itself is still alive for its handle
        assert_eq!(record.read().kind(), EffectKind::Roadsign);
    }
}
