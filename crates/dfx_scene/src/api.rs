//! Scripting surface
//!
//! Model-targeted entry points the binding layer calls. Each one
//! validates the model id against the object/building/vehicle
//! predicates, bounds-checks the index against the live count and only
//! then touches the record. Mutators snapshot the pre-edit record first
//! so the model can later be reset to it.
//!
//! Handle-targeted variants skip the model checks and operate on an
//! already-resolved handle.

use dfx_core::engine::GfxEngine;
use dfx_core::kind::EffectKind;
use dfx_props::{marshal, validate, EffectProperty, PropertyBag, Value};
use glam::Vec3;

use crate::error::EffectError;
use crate::handle::{rebuild_sign_visual, EffectHandle, EffectId};
use crate::model::{is_known_model, GameModels, ModelInfo, SharedEffect};
use crate::registry::EffectRegistry;

/// Create an effect on `model` and apply `bag` to it
///
/// The bag is validated up front. `Ok(None)` means the model's storage
/// refused the allocation, which is not a caller mistake.
pub fn create(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    registry: &mut EffectRegistry,
    model: u32,
    position: Vec3,
    kind: EffectKind,
    bag: &PropertyBag,
) -> Result<Option<EffectId>, EffectError> {
    if !is_known_model(models, model) {
        return Err(EffectError::InvalidModel(model));
    }
    if !kind.is_creatable() {
        return Err(EffectError::UnsupportedKind(kind));
    }
    validate(kind, bag)?;

    let info = models
        .model_info(model)
        .ok_or(EffectError::ModelInfoUnavailable(model))?;
    let Some(record) = info.add_effect(position, kind) else {
        log::debug!("model {model} refused a new {kind} effect");
        return Ok(None);
    };

    if !marshal::apply_all(engine, &mut record.write(), bag) {
        log::debug!("some properties were not applied to new {kind} effect");
    }
    refresh_visual(engine, &record);

    let handle = registry.register(model, record);
    Ok(Some(handle.id()))
}

/// Remove one effect by index, or all of the model's effects
pub fn remove(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    registry: &mut EffectRegistry,
    model: u32,
    index: Option<u32>,
    include_default: bool,
) -> Result<bool, EffectError> {
    if !is_known_model(models, model) {
        return Err(EffectError::InvalidModel(model));
    }
    let info = models
        .model_info(model)
        .ok_or(EffectError::ModelInfoUnavailable(model))?;

    match index {
        Some(index) => {
            if index >= info.effect_count() {
                return Err(EffectError::InvalidIndex(index));
            }
            // The model decides first; a refused removal (default effect
            // without include_default) keeps the record live and must
            // keep its handle too.
            let record = info.effect_at(index);
            let removed = info.remove_effect_at(engine, index, include_default);
            if removed {
                if let Some(handle) = record.as_ref().and_then(|record| registry.find(record)) {
                    registry.remove(&handle);
                }
            }
            Ok(removed)
        }
        None => {
            let removed_handles = registry.remove_by_owner(engine, info, model, None);
            let removed_rest = info.remove_all_effects(engine, include_default);
            Ok(removed_handles || removed_rest)
        }
    }
}

/// Revert the model's effects to their stored defaults
pub fn reset(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    registry: &mut EffectRegistry,
    model: u32,
    remove_custom: bool,
) -> Result<bool, EffectError> {
    if !is_known_model(models, model) {
        return Err(EffectError::InvalidModel(model));
    }
    let info = models
        .model_info(model)
        .ok_or(EffectError::ModelInfoUnavailable(model))?;
    if remove_custom {
        registry.remove_by_owner(engine, info, model, None);
    }
    Ok(info.reset_effects(engine, remove_custom))
}

/// Apply a validated bag to the effect at `index`
pub fn set_properties(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
    bag: &PropertyBag,
) -> Result<bool, EffectError> {
    let record = resolve(models, model, index)?;
    validate(record.read().kind(), bag)?;
    snapshot(engine, models, model, &record);

    let applied = marshal::apply_all(engine, &mut record.write(), bag);
    refresh_visual(engine, &record);
    Ok(applied)
}

/// Read every property of the effect at `index`
pub fn get_properties(
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
) -> Result<PropertyBag, EffectError> {
    let record = resolve(models, model, index)?;
    let bag = marshal::read_all(&record.read());
    Ok(bag)
}

/// Set a single property on the effect at `index`
pub fn set_property(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
    property: EffectProperty,
    value: &Value,
) -> Result<bool, EffectError> {
    let record = resolve(models, model, index)?;
    snapshot(engine, models, model, &record);

    let applied = marshal::apply_one(engine, &mut record.write(), property, value);
    if applied {
        refresh_visual(engine, &record);
    }
    Ok(applied)
}

/// Read a single property of the effect at `index`
///
/// `Ok(None)` when the effect's kind does not carry the property.
pub fn get_property(
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
    property: EffectProperty,
) -> Result<Option<Value>, EffectError> {
    let record = resolve(models, model, index)?;
    let value = marshal::read_one(&record.read(), property);
    Ok(value)
}

pub fn set_position(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
    position: Vec3,
) -> Result<(), EffectError> {
    let record = resolve(models, model, index)?;
    snapshot(engine, models, model, &record);
    record.write().position = position;
    refresh_visual(engine, &record);
    Ok(())
}

pub fn get_position(
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
) -> Result<Vec3, EffectError> {
    let record = resolve(models, model, index)?;
    let position = record.read().position;
    Ok(position)
}

/// Number of live effects on `model`
pub fn count(models: &mut dyn GameModels, model: u32) -> Result<u32, EffectError> {
    if !is_known_model(models, model) {
        return Err(EffectError::InvalidModel(model));
    }
    let info = models
        .model_info(model)
        .ok_or(EffectError::ModelInfoUnavailable(model))?;
    Ok(info.effect_count())
}

// ---- handle-targeted variants ----

pub fn set_properties_on(
    engine: &mut dyn GfxEngine,
    handle: &EffectHandle,
    bag: &PropertyBag,
) -> Result<bool, EffectError> {
    validate(handle.kind(), bag)?;
    let applied = marshal::apply_all(engine, &mut handle.record().write(), bag);
    refresh_visual(engine, handle.record());
    Ok(applied)
}

pub fn get_properties_on(handle: &EffectHandle) -> PropertyBag {
    marshal::read_all(&handle.record().read())
}

pub fn set_property_on(
    engine: &mut dyn GfxEngine,
    handle: &EffectHandle,
    property: EffectProperty,
    value: &Value,
) -> bool {
    let applied = marshal::apply_one(engine, &mut handle.record().write(), property, value);
    if applied {
        refresh_visual(engine, handle.record());
    }
    applied
}

pub fn get_property_on(handle: &EffectHandle, property: EffectProperty) -> Option<Value> {
    marshal::read_one(&handle.record().read(), property)
}

// ---- helpers ----

/// Model checks plus index bounds check, then the record itself
fn resolve(
    models: &mut dyn GameModels,
    model: u32,
    index: u32,
) -> Result<SharedEffect, EffectError> {
    if !is_known_model(models, model) {
        return Err(EffectError::InvalidModel(model));
    }
    let info = models
        .model_info(model)
        .ok_or(EffectError::ModelInfoUnavailable(model))?;
    if index >= info.effect_count() {
        return Err(EffectError::InvalidIndex(index));
    }
    info.effect_at(index).ok_or(EffectError::InvalidIndex(index))
}

fn snapshot(
    engine: &mut dyn GfxEngine,
    models: &mut dyn GameModels,
    model: u32,
    record: &SharedEffect,
) {
    if let Some(info) = models.model_info(model) {
        info.store_default_effect(engine, record);
    }
}

/// Roadsign geometry depends on position, size, rotation, flags and
/// text, so any write may invalidate the built visual
fn refresh_visual(engine: &mut dyn GfxEngine, record: &SharedEffect) {
    let mut guard = record.write();
    let position = guard.position;
    if let Some(sign) = guard.as_roadsign_mut() {
        rebuild_sign_visual(engine, position, sign);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModels;
    use dfx_core::engine::PARTICLE_GROUP;
    use dfx_core::mock::MockEngine;

    const MODEL: u32 = 400;

    fn setup() -> (MockEngine, MockModels, EffectRegistry) {
        let mut engine = MockEngine::new();
        engine.register_group(PARTICLE_GROUP, ["coronastar", "coronamoon", "shad_exp"]);
        let mut models = MockModels::new();
        models.add_object(MODEL);
        (engine, models, EffectRegistry::new())
    }

    fn sign_bag() -> PropertyBag {
        [
            ("sizeX", Value::Number(2.0)),
            ("sizeY", Value::Number(1.0)),
            ("rotX", Value::Number(0.0)),
            ("rotY", Value::Number(0.0)),
            ("rotZ", Value::Number(45.0)),
            ("flags", Value::Number(0b000101 as f64)),
            ("text1", Value::Text("SLOW".into())),
            ("text2", Value::Text("".into())),
            ("text3", Value::Text("".into())),
            ("text4", Value::Text("".into())),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }

    #[test]
    fn test_create_rejects_bad_model_kind_and_bag() {
        let (mut engine, mut models, mut registry) = setup();

        assert_eq!(
            create(
                &mut engine,
                &mut models,
                &mut registry,
                999,
                Vec3::ZERO,
                EffectKind::Light,
                &PropertyBag::new()
            ),
            Err(EffectError::InvalidModel(999))
        );
        assert_eq!(
            create(
                &mut engine,
                &mut models,
                &mut registry,
                MODEL,
                Vec3::ZERO,
                EffectKind::CoverPoint,
                &PropertyBag::new()
            ),
            Err(EffectError::UnsupportedKind(EffectKind::CoverPoint))
        );
        assert!(matches!(
            create(
                &mut engine,
                &mut models,
                &mut registry,
                MODEL,
                Vec3::ZERO,
                EffectKind::Roadsign,
                &PropertyBag::new()
            ),
            Err(EffectError::InvalidProperty(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_roadsign_builds_visual() {
        let (mut engine, mut models, mut registry) = setup();

        let id = create(
            &mut engine,
            &mut models,
            &mut registry,
            MODEL,
            Vec3::new(10.0, 0.0, 3.0),
            EffectKind::Roadsign,
            &sign_bag(),
        )
        .unwrap()
        .unwrap();

        let handle = registry.get(id).unwrap();
        assert!(handle.is_roadsign());
        assert_eq!(handle.roadsign_text_line(1), "SLOW");
        assert_eq!(engine.live_atomic_count(), 1);

        // one line, two letters per line, palette 0
        let sign_record = handle.record().read();
        let atomic_id = sign_record.as_roadsign().unwrap().atomic.as_ref().unwrap().id();
        let build = engine.atomic_build(atomic_id).unwrap();
        assert_eq!(build.lines, vec!["SLOW".to_string()]);
        assert_eq!(build.letters_per_line, 2);
        assert_eq!(build.palette, 0);
    }

    #[test]
    fn test_create_allocation_refusal_is_not_an_error() {
        let (mut engine, mut models, mut registry) = setup();
        models.info(MODEL).unwrap().deny_add = true;

        // sun-glare carries no properties, so an empty bag validates
        let created = create(
            &mut engine,
            &mut models,
            &mut registry,
            MODEL,
            Vec3::ZERO,
            EffectKind::SunGlare,
            &PropertyBag::new(),
        );
        assert_eq!(created, Ok(None));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_by_index_and_bounds() {
        let (mut engine, mut models, mut registry) = setup();
        let id = create(
            &mut engine,
            &mut models,
            &mut registry,
            MODEL,
            Vec3::ZERO,
            EffectKind::SunGlare,
            &PropertyBag::new(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, Some(5), false),
            Err(EffectError::InvalidIndex(5))
        );
        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, Some(0), false),
            Ok(true)
        );
        assert!(registry.get(id).is_none());
        assert_eq!(count(&mut models, MODEL), Ok(0));
    }

    #[test]
    fn test_refused_removal_keeps_handle_registered() {
        let (mut engine, mut models, mut registry) = setup();
        let record = models
            .info(MODEL)
            .unwrap()
            .seed_default(Vec3::ZERO, EffectKind::Light);
        registry.register(MODEL, std::sync::Arc::clone(&record));

        // a default effect survives removal without include_default, and
        // so must its handle
        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, Some(0), false),
            Ok(false)
        );
        assert_eq!(count(&mut models, MODEL), Ok(1));
        assert!(registry.find(&record).is_some());

        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, Some(0), true),
            Ok(true)
        );
        assert_eq!(count(&mut models, MODEL), Ok(0));
        assert!(registry.find(&record).is_none());
    }

    #[test]
    fn test_remove_all_reports_whether_anything_went() {
        let (mut engine, mut models, mut registry) = setup();
        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, None, true),
            Ok(false)
        );

        models
            .info(MODEL)
            .unwrap()
            .seed_default(Vec3::ZERO, EffectKind::Light);
        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, None, false),
            Ok(false)
        );
        assert_eq!(count(&mut models, MODEL), Ok(1));
        assert_eq!(
            remove(&mut engine, &mut models, &mut registry, MODEL, None, true),
            Ok(true)
        );
        assert_eq!(count(&mut models, MODEL), Ok(0));
    }

    #[test]
    fn test_set_properties_snapshots_for_reset() {
        let (mut engine, mut models, mut registry) = setup();
        models
            .info(MODEL)
            .unwrap()
            .seed_default(Vec3::ZERO, EffectKind::Roadsign);

        assert_eq!(
            set_properties(&mut engine, &mut models, MODEL, 0, &sign_bag()),
            Ok(true)
        );
        assert_eq!(
            get_property(&mut models, MODEL, 0, EffectProperty::Text),
            Ok(Some(Value::from("SLOW")))
        );

        assert_eq!(reset(&mut engine, &mut models, &mut registry, MODEL, false), Ok(true));
        assert_eq!(
            get_property(&mut models, MODEL, 0, EffectProperty::Text),
            Ok(Some(Value::from("")))
        );
        assert_eq!(engine.double_destroys, 0);
    }

    #[test]
    fn test_position_roundtrip_and_index_check() {
        let (mut engine, mut models, mut registry) = setup();
        create(
            &mut engine,
            &mut models,
            &mut registry,
            MODEL,
            Vec3::ZERO,
            EffectKind::SunGlare,
            &PropertyBag::new(),
        )
        .unwrap();

        set_position(&mut engine, &mut models, MODEL, 0, Vec3::new(5.0, 6.0, 7.0)).unwrap();
        assert_eq!(
            get_position(&mut models, MODEL, 0),
            Ok(Vec3::new(5.0, 6.0, 7.0))
        );
        assert_eq!(
            get_position(&mut models, MODEL, 1),
            Err(EffectError::InvalidIndex(1))
        );
    }

    #[test]
    fn test_model_without_info() {
        let (mut engine, mut models, mut registry) = setup();
        models.add_object_without_info(777);
        assert_eq!(
            create(
                &mut engine,
                &mut models,
                &mut registry,
                777,
                Vec3::ZERO,
                EffectKind::SunGlare,
                &PropertyBag::new()
            ),
            Err(EffectError::ModelInfoUnavailable(777))
        );
        assert_eq!(count(&mut models, 777), Err(EffectError::ModelInfoUnavailable(777)));
    }
}
