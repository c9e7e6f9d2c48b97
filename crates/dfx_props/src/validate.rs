//! Per-kind validation of property bags
//!
//! Checked before a bag may be applied to a record: every required key
//! must be present, carry the right value variant and satisfy its range
//! constraint. The first offending key is reported. Kinds without
//! properties have nothing to check and always validate.

use dfx_core::kind::{CoronaFlashType, EffectKind, TextureName};
use dfx_core::record::PARTICLE_NAME_LEN;

use crate::value::{PropertyBag, Value};
use crate::PropertyError;

/// Validate `bag` for effects of `kind`
pub fn validate(kind: EffectKind, bag: &PropertyBag) -> Result<(), PropertyError> {
    match kind {
        EffectKind::Light => validate_light(bag),
        EffectKind::Particle => validate_particle(bag),
        EffectKind::Roadsign => validate_roadsign(bag),
        EffectKind::Escalator => validate_escalator(bag),
        // Position-and-type-only kinds: nothing to check
        _ => Ok(()),
    }
}

fn validate_light(bag: &PropertyBag) -> Result<(), PropertyError> {
    require_number(bag, "draw_distance")?;
    require_number(bag, "light_range")?;
    require_number(bag, "corona_size")?;
    require_number(bag, "shadow_size")?;

    let multiplier = require_number(bag, "shadow_multiplier")?;
    if multiplier < 0.0 {
        return Err(invalid("shadow_multiplier"));
    }

    let show_mode = require_text(bag, "show_mode")?;
    if CoronaFlashType::from_name(show_mode).is_none() {
        return Err(invalid("show_mode"));
    }

    require_bool(bag, "corona_reflection")?;

    let flare_type = require_number(bag, "flare_type")?;
    if !(0.0..=1.0).contains(&flare_type) {
        return Err(invalid("flare_type"));
    }

    let flags = require_number(bag, "flags")?;
    if flags < 0.0 {
        return Err(invalid("flags"));
    }

    require_number(bag, "shadow_distance")?;
    require_number(bag, "offsetX")?;
    require_number(bag, "offsetY")?;
    require_number(bag, "offsetZ")?;
    require_number(bag, "color")?;

    let corona_name = require_text(bag, "corona_name")?;
    if !TextureName::is_known(corona_name) {
        return Err(invalid("corona_name"));
    }

    let shadow_name = require_text(bag, "shadow_name")?;
    if !TextureName::is_known(shadow_name) {
        return Err(invalid("shadow_name"));
    }

    Ok(())
}

fn validate_particle(bag: &PropertyBag) -> Result<(), PropertyError> {
    let name = require_text(bag, "name")?;
    if name.len() > PARTICLE_NAME_LEN {
        return Err(invalid("name"));
    }
    Ok(())
}

fn validate_roadsign(bag: &PropertyBag) -> Result<(), PropertyError> {
    require_number(bag, "sizeX")?;
    require_number(bag, "sizeY")?;
    require_number(bag, "rotX")?;
    require_number(bag, "rotY")?;
    require_number(bag, "rotZ")?;

    let flags = require_number(bag, "flags")?;
    if flags < 0.0 {
        return Err(invalid("flags"));
    }

    // No length cap: lines are truncated to their 16-byte segment when
    // written into the record.
    require_text(bag, "text1")?;
    require_text(bag, "text2")?;
    require_text(bag, "text3")?;
    require_text(bag, "text4")?;

    Ok(())
}

fn validate_escalator(bag: &PropertyBag) -> Result<(), PropertyError> {
    require_number(bag, "bottomX")?;
    require_number(bag, "bottomY")?;
    require_number(bag, "bottomZ")?;
    require_number(bag, "topX")?;
    require_number(bag, "topY")?;
    require_number(bag, "topZ")?;
    require_number(bag, "endX")?;
    require_number(bag, "endY")?;
    require_number(bag, "endZ")?;

    let direction = require_number(bag, "direction")?;
    if !(0.0..=1.0).contains(&direction) {
        return Err(invalid("direction"));
    }

    Ok(())
}

fn invalid(key: &'static str) -> PropertyError {
    PropertyError::InvalidValue { key }
}

fn require_number(bag: &PropertyBag, key: &'static str) -> Result<f64, PropertyError> {
    bag.get(key)
        .and_then(Value::as_number)
        .ok_or(invalid(key))
}

fn require_bool(bag: &PropertyBag, key: &'static str) -> Result<bool, PropertyError> {
    bag.get(key).and_then(Value::as_bool).ok_or(invalid(key))
}

fn require_text<'a>(bag: &'a PropertyBag, key: &'static str) -> Result<&'a str, PropertyError> {
    bag.get(key).and_then(Value::as_text).ok_or(invalid(key))
}
