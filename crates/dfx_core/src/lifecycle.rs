//! Effect lifecycle: shutdown, destroy, clone
//!
//! The stock engine's own effect teardown corrupts memory under some
//! conditions, so resource release is implemented here instead of being
//! delegated: each owned resource is checked and released independently,
//! and a record with partial state (text but no visual, one texture of
//! two) tears down cleanly.

use crate::engine::{GfxEngine, TextureHandle, TxdScope, PARTICLE_GROUP};
use crate::record::{EffectData, EffectRecord, RoadsignText};
use crate::roadsign;

/// Release the kind-specific owned resources of a record
///
/// Light: both texture handles. Roadsign: text buffer and visual.
/// Every other kind owns nothing; the call is a no-op for them.
pub fn shutdown_resources(engine: &mut dyn GfxEngine, record: &mut EffectRecord) {
    match &mut record.data {
        EffectData::Roadsign(sign) => {
            sign.text = None;
            roadsign::destroy_visual(engine, sign);
        }
        EffectData::Light(light) => {
            if let Some(tex) = light.corona_tex.take() {
                engine.destroy_texture(tex);
            }
            if let Some(tex) = light.shadow_tex.take() {
                engine.destroy_texture(tex);
            }
        }
        _ => {}
    }
}

/// Release a record's resources and its storage
pub fn destroy_record(engine: &mut dyn GfxEngine, mut record: EffectRecord) {
    shutdown_resources(engine, &mut record);
}

/// Deep-copy a record
///
/// Scalar fields copy bitwise; owned resources are re-acquired so the
/// clone never aliases the source: light textures are re-read by name,
/// the roadsign text buffer is reallocated, and the roadsign visual is
/// rebuilt from the copied geometry. Resources that fail to re-acquire
/// are simply absent on the clone.
pub fn clone_record(engine: &mut dyn GfxEngine, source: &EffectRecord) -> EffectRecord {
    let data = match &source.data {
        EffectData::Light(light) => {
            let mut copy = light.clone_fields();
            // Reload both textures only when the source holds both, as a
            // fresh pair with the same names.
            if let (Some(corona), Some(shadow)) = (&light.corona_tex, &light.shadow_tex) {
                prepare_light_textures(
                    engine,
                    &mut copy.corona_tex,
                    &mut copy.shadow_tex,
                    Some(corona.name()),
                    Some(shadow.name()),
                    false,
                );
            }
            EffectData::Light(copy)
        }
        EffectData::Roadsign(sign) => {
            let text = sign.text.clone();
            let atomic = if sign.atomic.is_some() {
                roadsign::build_visual(
                    engine,
                    source.position,
                    sign.rotation,
                    sign.size,
                    sign.flags,
                    text.as_ref().unwrap_or(&RoadsignText::new()),
                )
            } else {
                None
            };
            EffectData::Roadsign(crate::record::Roadsign {
                size: sign.size,
                rotation: sign.rotation,
                flags: sign.flags,
                text,
                atomic,
            })
        }
        EffectData::Particle(particle) => EffectData::Particle(*particle),
        EffectData::Escalator(escalator) => EffectData::Escalator(*escalator),
        other => EffectData::empty_of_kind(other.kind()),
    };

    EffectRecord {
        position: source.position,
        data,
    }
}

/// Acquire corona and shadow textures for a light effect
///
/// Selection of the "particle" resource group is scoped: the previous
/// selection is restored even when a load fails. When `replace` is set,
/// an existing texture is destroyed before its slot is reloaded, but
/// only for slots a new name was supplied for. A failed load leaves the
/// slot absent, which every consumer treats as a valid state.
pub fn prepare_light_textures(
    engine: &mut dyn GfxEngine,
    corona_tex: &mut Option<TextureHandle>,
    shadow_tex: &mut Option<TextureHandle>,
    corona_name: Option<&str>,
    shadow_name: Option<&str>,
    replace: bool,
) {
    let mut scope = TxdScope::select(engine, PARTICLE_GROUP);

    if replace {
        if corona_name.is_some() {
            if let Some(old) = corona_tex.take() {
                scope.destroy_texture(old);
            }
        }
        if shadow_name.is_some() {
            if let Some(old) = shadow_tex.take() {
                scope.destroy_texture(old);
            }
        }
    }

    if let Some(name) = corona_name {
        *corona_tex = scope.read_texture(name);
        if corona_tex.is_none() {
            log::debug!("corona texture {name:?} not found");
        }
    }

    if let Some(name) = shadow_name {
        *shadow_tex = scope.read_texture(name);
        if shadow_tex.is_none() {
            log::debug!("shadow texture {name:?} not found");
        }
    }
}
