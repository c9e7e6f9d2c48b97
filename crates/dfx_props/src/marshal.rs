//! Property marshaling: bag/identifier values to and from record fields
//!
//! Two write paths exist on purpose. The bag path ([`apply_all`]) is the
//! legacy whole-bag setter and keeps its historical abgr color packing;
//! the identifier path ([`apply_one`]) is authoritative and packs argb.
//! Scripts exist that depend on each, so neither is silently unified
//! into the other.

use dfx_core::color::Color;
use dfx_core::engine::GfxEngine;
use dfx_core::kind::{CoronaFlashType, TextureName};
use dfx_core::lifecycle::prepare_light_textures;
use dfx_core::record::{EffectRecord, RoadsignText};

use crate::property::EffectProperty;
use crate::value::{PropertyBag, Value};

/// Which packed color order a write/read path uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorOrder {
    /// R in bits 16-23 (property-identifier path, authoritative)
    Argb,
    /// R in bits 0-7 (legacy bag path)
    Abgr,
}

/// Apply every key in the bag to the record
///
/// Each key resolves and applies independently; an unknown key or a
/// value the record rejects fails that key without stopping the rest.
/// Returns true only if every key applied.
pub fn apply_all(engine: &mut dyn GfxEngine, record: &mut EffectRecord, bag: &PropertyBag) -> bool {
    let mut all_applied = true;
    for (key, value) in bag {
        match EffectProperty::from_key(key) {
            Some(property) => {
                if !apply_property(engine, record, property, value, ColorOrder::Abgr) {
                    log::debug!("property {key:?} rejected for {} effect", record.kind());
                    all_applied = false;
                }
            }
            None => {
                log::debug!("unknown property key {key:?}");
                all_applied = false;
            }
        }
    }
    all_applied
}

/// Apply a single identified property
///
/// Returns false if the record's kind does not carry the property or the
/// value has the wrong variant (or fails enum-name resolution).
pub fn apply_one(
    engine: &mut dyn GfxEngine,
    record: &mut EffectRecord,
    property: EffectProperty,
    value: &Value,
) -> bool {
    apply_property(engine, record, property, value, ColorOrder::Argb)
}

/// Read every property of the record's kind into a bag
///
/// Unsupported kinds produce an empty bag. Absent textures read as empty
/// strings. Uses the legacy abgr color packing, matching [`apply_all`].
pub fn read_all(record: &EffectRecord) -> PropertyBag {
    EffectProperty::properties_of(record.kind())
        .iter()
        .filter_map(|&property| {
            read_property(record, property, ColorOrder::Abgr)
                .map(|value| (property.key().to_string(), value))
        })
        .collect()
}

/// Read a single identified property
///
/// `None` if the record's kind does not carry the property. Uses the
/// authoritative argb color packing, matching [`apply_one`].
pub fn read_one(record: &EffectRecord, property: EffectProperty) -> Option<Value> {
    read_property(record, property, ColorOrder::Argb)
}

fn apply_property(
    engine: &mut dyn GfxEngine,
    record: &mut EffectRecord,
    property: EffectProperty,
    value: &Value,
    color_order: ColorOrder,
) -> bool {
    use EffectProperty as P;

    if !property.applies_to(record.kind()) {
        return false;
    }

    match property {
        // ---- light ----
        P::FarClipDistance => set_light_f32(record, value, |light, v| light.corona_far_clip = v),
        P::LightRange => set_light_f32(record, value, |light, v| light.point_light_range = v),
        P::CoronaSize => set_light_f32(record, value, |light, v| light.corona_size = v),
        P::ShadowSize => set_light_f32(record, value, |light, v| light.shadow_size = v),
        P::ShadowMult => set_light_f32(record, value, |light, v| {
            light.shadow_color_multiplier = v as u8
        }),
        P::FlashType => {
            let Some(flash) = value.as_text().and_then(CoronaFlashType::from_name) else {
                return false;
            };
            let Some(light) = record.as_light_mut() else {
                return false;
            };
            light.flash_type = flash;
            true
        }
        P::CoronaReflection => {
            let (Some(enabled), Some(light)) = (value.as_bool(), record.as_light_mut()) else {
                return false;
            };
            light.corona_reflection = enabled;
            true
        }
        P::FlareType => set_light_f32(record, value, |light, v| light.flare_type = v as u8),
        P::ShadowDistance => {
            set_light_f32(record, value, |light, v| light.shadow_z_distance = v as i8)
        }
        P::OffsetX => set_light_f32(record, value, |light, v| light.offset[0] = v as i8),
        P::OffsetY => set_light_f32(record, value, |light, v| light.offset[1] = v as i8),
        P::OffsetZ => set_light_f32(record, value, |light, v| light.offset[2] = v as i8),
        P::Color => {
            let (Some(number), Some(light)) = (value.as_number(), record.as_light_mut()) else {
                return false;
            };
            let packed = number as i64 as u32;
            light.color = match color_order {
                ColorOrder::Argb => Color::from_argb(packed),
                ColorOrder::Abgr => Color::from_abgr(packed),
            };
            true
        }
        P::CoronaName => {
            let Some(name) = known_texture(value) else {
                return false;
            };
            let Some(light) = record.as_light_mut() else {
                return false;
            };
            prepare_light_textures(
                engine,
                &mut light.corona_tex,
                &mut light.shadow_tex,
                Some(name),
                None,
                true,
            );
            true
        }
        P::ShadowName => {
            let Some(name) = known_texture(value) else {
                return false;
            };
            let Some(light) = record.as_light_mut() else {
                return false;
            };
            prepare_light_textures(
                engine,
                &mut light.corona_tex,
                &mut light.shadow_tex,
                None,
                Some(name),
                true,
            );
            true
        }
        P::Flags => {
            let Some(number) = value.as_number() else {
                return false;
            };
            if let Some(light) = record.as_light_mut() {
                light.flags = number as u16;
            } else if let Some(sign) = record.as_roadsign_mut() {
                sign.flags = number as u8;
            }
            true
        }

        // ---- particle ----
        P::PrtName => {
            let (Some(name), Some(particle)) = (value.as_text(), record.as_particle_mut()) else {
                return false;
            };
            particle.set_name(name);
            true
        }

        // ---- roadsign ----
        P::SizeX => set_sign_f32(record, value, |sign, v| sign.size.x = v),
        P::SizeY => set_sign_f32(record, value, |sign, v| sign.size.y = v),
        P::RotX => set_sign_f32(record, value, |sign, v| sign.rotation.x = v),
        P::RotY => set_sign_f32(record, value, |sign, v| sign.rotation.y = v),
        P::RotZ => set_sign_f32(record, value, |sign, v| sign.rotation.z = v),
        P::Text | P::Text2 | P::Text3 | P::Text4 => {
            let Some(text) = value.as_text() else {
                return false;
            };
            let line = match property {
                P::Text => 1,
                P::Text2 => 2,
                P::Text3 => 3,
                _ => 4,
            };
            let Some(sign) = record.as_roadsign_mut() else {
                return false;
            };
            sign.text
                .get_or_insert_with(RoadsignText::new)
                .set_line(line, text);
            true
        }

        // ---- escalator ----
        P::BottomX => set_escalator_f32(record, value, |esc, v| esc.bottom.x = v),
        P::BottomY => set_escalator_f32(record, value, |esc, v| esc.bottom.y = v),
        P::BottomZ => set_escalator_f32(record, value, |esc, v| esc.bottom.z = v),
        P::TopX => set_escalator_f32(record, value, |esc, v| esc.top.x = v),
        P::TopY => set_escalator_f32(record, value, |esc, v| esc.top.y = v),
        P::TopZ => set_escalator_f32(record, value, |esc, v| esc.top.z = v),
        P::EndX => set_escalator_f32(record, value, |esc, v| esc.end.x = v),
        P::EndY => set_escalator_f32(record, value, |esc, v| esc.end.y = v),
        P::EndZ => set_escalator_f32(record, value, |esc, v| esc.end.z = v),
        P::Direction => set_escalator_f32(record, value, |esc, v| esc.direction = v as u8),
    }
}

fn read_property(
    record: &EffectRecord,
    property: EffectProperty,
    color_order: ColorOrder,
) -> Option<Value> {
    use EffectProperty as P;

    if !property.applies_to(record.kind()) {
        return None;
    }

    let value = match property {
        // ---- light ----
        P::FarClipDistance => Value::from(record.as_light()?.corona_far_clip),
        P::LightRange => Value::from(record.as_light()?.point_light_range),
        P::CoronaSize => Value::from(record.as_light()?.corona_size),
        P::ShadowSize => Value::from(record.as_light()?.shadow_size),
        P::ShadowMult => Value::Number(record.as_light()?.shadow_color_multiplier as f64),
        P::FlashType => Value::from(record.as_light()?.flash_type.name()),
        P::CoronaReflection => Value::Bool(record.as_light()?.corona_reflection),
        P::FlareType => Value::Number(record.as_light()?.flare_type as f64),
        P::ShadowDistance => Value::Number(record.as_light()?.shadow_z_distance as f64),
        P::OffsetX => Value::Number(record.as_light()?.offset[0] as f64),
        P::OffsetY => Value::Number(record.as_light()?.offset[1] as f64),
        P::OffsetZ => Value::Number(record.as_light()?.offset[2] as f64),
        P::Color => {
            let color = record.as_light()?.color;
            Value::from(match color_order {
                ColorOrder::Argb => color.to_argb(),
                ColorOrder::Abgr => color.to_abgr(),
            })
        }
        P::CoronaName => texture_name_value(record.as_light()?.corona_tex.as_ref()),
        P::ShadowName => texture_name_value(record.as_light()?.shadow_tex.as_ref()),
        P::Flags => match (record.as_light(), record.as_roadsign()) {
            (Some(light), _) => Value::Number(light.flags as f64),
            (_, Some(sign)) => Value::Number(sign.flags as f64),
            _ => return None,
        },

        // ---- particle ----
        P::PrtName => Value::from(record.as_particle()?.name()),

        // ---- roadsign ----
        P::SizeX => Value::from(record.as_roadsign()?.size.x),
        P::SizeY => Value::from(record.as_roadsign()?.size.y),
        P::RotX => Value::from(record.as_roadsign()?.rotation.x),
        P::RotY => Value::from(record.as_roadsign()?.rotation.y),
        P::RotZ => Value::from(record.as_roadsign()?.rotation.z),
        P::Text | P::Text2 | P::Text3 | P::Text4 => {
            let line = match property {
                P::Text => 1,
                P::Text2 => 2,
                P::Text3 => 3,
                _ => 4,
            };
            let sign = record.as_roadsign()?;
            Value::from(
                sign.text
                    .as_ref()
                    .map(|text| text.line(line))
                    .unwrap_or_default(),
            )
        }

        // ---- escalator ----
        P::BottomX => Value::from(record.as_escalator()?.bottom.x),
        P::BottomY => Value::from(record.as_escalator()?.bottom.y),
        P::BottomZ => Value::from(record.as_escalator()?.bottom.z),
        P::TopX => Value::from(record.as_escalator()?.top.x),
        P::TopY => Value::from(record.as_escalator()?.top.y),
        P::TopZ => Value::from(record.as_escalator()?.top.z),
        P::EndX => Value::from(record.as_escalator()?.end.x),
        P::EndY => Value::from(record.as_escalator()?.end.y),
        P::EndZ => Value::from(record.as_escalator()?.end.z),
        P::Direction => Value::Number(record.as_escalator()?.direction as f64),
    };

    Some(value)
}

fn set_light_f32(
    record: &mut EffectRecord,
    value: &Value,
    set: impl FnOnce(&mut dfx_core::record::Light, f32),
) -> bool {
    match (record.as_light_mut(), value.as_number()) {
        (Some(light), Some(number)) => {
            set(light, number as f32);
            true
        }
        _ => false,
    }
}

fn set_sign_f32(
    record: &mut EffectRecord,
    value: &Value,
    set: impl FnOnce(&mut dfx_core::record::Roadsign, f32),
) -> bool {
    match (record.as_roadsign_mut(), value.as_number()) {
        (Some(sign), Some(number)) => {
            set(sign, number as f32);
            true
        }
        _ => false,
    }
}

fn set_escalator_f32(
    record: &mut EffectRecord,
    value: &Value,
    set: impl FnOnce(&mut dfx_core::record::Escalator, f32),
) -> bool {
    match (record.as_escalator_mut(), value.as_number()) {
        (Some(escalator), Some(number)) => {
            set(escalator, number as f32);
            true
        }
        _ => false,
    }
}

fn known_texture(value: &Value) -> Option<&str> {
    value.as_text().filter(|name| TextureName::is_known(name))
}

fn texture_name_value(texture: Option<&dfx_core::engine::TextureHandle>) -> Value {
    Value::from(texture.map(|tex| tex.name()).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::ALL_PROPERTIES;
    use crate::testutil::{escalator_bag, light_bag, roadsign_bag};
    use dfx_core::engine::PARTICLE_GROUP;
    use dfx_core::kind::EffectKind;
    use dfx_core::mock::MockEngine;
    use glam::Vec3;

    fn engine() -> MockEngine {
        let mut engine = MockEngine::new();
        engine.register_group(PARTICLE_GROUP, ["coronastar", "coronamoon", "shad_exp"]);
        engine
    }

    #[test]
    fn test_apply_all_light_then_read_all_roundtrip() {
        let mut engine = engine();
        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Light);
        let bag = light_bag();
        assert!(apply_all(&mut engine, &mut record, &bag));

        let back = read_all(&record);
        for (key, value) in &bag {
            assert_eq!(back.get(key), Some(value), "key {key}");
        }
        assert_eq!(engine.live_texture_count(), 2);
    }

    #[test]
    fn test_apply_all_roadsign_and_escalator() {
        let mut engine = engine();

        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Roadsign);
        assert!(apply_all(&mut engine, &mut record, &roadsign_bag()));
        let sign = record.as_roadsign().unwrap();
        assert_eq!(sign.size.x, 2.0);
        assert_eq!(sign.text.as_ref().unwrap().line(1), "STOP");
        assert_eq!(sign.text.as_ref().unwrap().line(4), "NOW");

        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Escalator);
        assert!(apply_all(&mut engine, &mut record, &escalator_bag()));
        let escalator = record.as_escalator().unwrap();
        assert_eq!(escalator.top, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(escalator.direction, 1);
    }

    #[test]
    fn test_apply_all_continues_past_bad_keys() {
        let mut engine = engine();
        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Roadsign);
        let mut bag = roadsign_bag();
        bag.insert("no_such_key".into(), Value::Bool(true));
        bag.insert("sizeY".into(), Value::Text("wide".into()));

        assert!(!apply_all(&mut engine, &mut record, &bag));
        // the well-formed keys still landed
        let sign = record.as_roadsign().unwrap();
        assert_eq!(sign.size.x, 2.0);
        assert_eq!(sign.size.y, 0.0);
        assert_eq!(sign.text.as_ref().unwrap().line(2), "HAMMER");
    }

    #[test]
    fn test_mismatched_property_leaves_record_untouched() {
        let mut engine = engine();
        for kind in [
            EffectKind::Light,
            EffectKind::Particle,
            EffectKind::Roadsign,
            EffectKind::Escalator,
            EffectKind::SunGlare,
            EffectKind::CoverPoint,
        ] {
            let mut record = EffectRecord::new(Vec3::ZERO, kind);
            for &property in ALL_PROPERTIES {
                if property.applies_to(kind) {
                    continue;
                }
                assert!(
                    !apply_one(&mut engine, &mut record, property, &Value::Number(1.0)),
                    "{property:?} accepted on {kind}"
                );
                assert_eq!(read_one(&record, property), None);
            }
        }
        assert_eq!(engine.live_texture_count(), 0);
    }

    #[test]
    fn test_apply_one_type_mismatch() {
        let mut engine = engine();
        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Light);
        assert!(!apply_one(
            &mut engine,
            &mut record,
            EffectProperty::CoronaSize,
            &Value::Text("big".into())
        ));
        assert!(!apply_one(
            &mut engine,
            &mut record,
            EffectProperty::FlashType,
            &Value::Number(3.0)
        ));
        // unknown enum names fail resolution
        assert!(!apply_one(
            &mut engine,
            &mut record,
            EffectProperty::FlashType,
            &Value::Text("STROBE".into())
        ));
        assert!(!apply_one(
            &mut engine,
            &mut record,
            EffectProperty::CoronaName,
            &Value::Text("not_a_texture".into())
        ));
    }

    #[test]
    fn test_color_orders_by_path() {
        let mut engine = engine();
        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Light);

        // authoritative path: R in bits 16-23
        apply_one(
            &mut engine,
            &mut record,
            EffectProperty::Color,
            &Value::from(0xFF123456u32),
        );
        assert_eq!(
            record.as_light().unwrap().color,
            Color::new(0x12, 0x34, 0x56, 0xFF)
        );
        assert_eq!(
            read_one(&record, EffectProperty::Color),
            Some(Value::from(0xFF123456u32))
        );

        // legacy bag path interprets the same word with R in bits 0-7
        let bag: PropertyBag = [("color".to_string(), Value::from(0xFF123456u32))]
            .into_iter()
            .collect();
        apply_all(&mut engine, &mut record, &bag);
        assert_eq!(
            record.as_light().unwrap().color,
            Color::new(0x56, 0x34, 0x12, 0xFF)
        );
        assert_eq!(read_all(&record).get("color"), Some(&Value::from(0xFF123456u32)));
    }

    #[test]
    fn test_texture_replacement_via_property() {
        let mut engine = engine();
        let mut record = EffectRecord::new(Vec3::ZERO, EffectKind::Light);
        assert!(apply_one(
            &mut engine,
            &mut record,
            EffectProperty::CoronaName,
            &Value::from("coronastar")
        ));
        let first = record.as_light().unwrap().corona_tex.as_ref().unwrap().id();

        assert!(apply_one(
            &mut engine,
            &mut record,
            EffectProperty::CoronaName,
            &Value::from("coronamoon")
        ));
        assert!(!engine.is_texture_live(first));
        assert_eq!(
            read_one(&record, EffectProperty::CoronaName),
            Some(Value::from("coronamoon"))
        );
        assert_eq!(engine.live_texture_count(), 1);
        assert_eq!(engine.selection_depth(), 0);
    }

    #[test]
    fn test_absent_texture_reads_empty() {
        let record = EffectRecord::new(Vec3::ZERO, EffectKind::Light);
        assert_eq!(
            read_one(&record, EffectProperty::CoronaName),
            Some(Value::from(""))
        );
        assert_eq!(read_all(&record).get("corona_name"), Some(&Value::from("")));
    }

    #[test]
    fn test_read_all_unsupported_kind_is_empty() {
        let record = EffectRecord::new(Vec3::ZERO, EffectKind::SunGlare);
        assert!(read_all(&record).is_empty());
    }
}
