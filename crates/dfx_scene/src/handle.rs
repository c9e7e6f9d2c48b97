//! Effect handles
//!
//! An [`EffectHandle`] binds one shared effect record to the model that
//! owns it and exposes typed accessors over the record's fields. Every
//! accessor is gated on the record's kind: setters silently do nothing
//! and getters return a zero-value default when the kind does not match,
//! so generic dispatch code never has to special-case kind/property
//! pairs.

use std::sync::Arc;

use dfx_core::color::Color;
use dfx_core::engine::GfxEngine;
use dfx_core::kind::{CoronaFlashType, EffectKind, TextureName};
use dfx_core::lifecycle::prepare_light_textures;
use dfx_core::record::{Escalator, Light, Roadsign, RoadsignText};
use dfx_core::roadsign;
use glam::{Vec2, Vec3};

use crate::model::{ModelInfo, SharedEffect};

/// Registry-assigned identity of a live handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectId(pub(crate) u64);

impl EffectId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A record bound to its owning model
#[derive(Clone)]
pub struct EffectHandle {
    id: EffectId,
    model: u32,
    record: SharedEffect,
}

impl EffectHandle {
    pub(crate) fn new(id: EffectId, model: u32, record: SharedEffect) -> Self {
        Self { id, model, record }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn model(&self) -> u32 {
        self.model
    }

    pub fn record(&self) -> &SharedEffect {
        &self.record
    }

    /// True if this handle and `record` share one underlying record
    pub fn binds(&self, record: &SharedEffect) -> bool {
        Arc::ptr_eq(&self.record, record)
    }

    pub fn kind(&self) -> EffectKind {
        self.record.read().kind()
    }

    pub fn is_light(&self) -> bool {
        self.kind() == EffectKind::Light
    }

    pub fn is_particle(&self) -> bool {
        self.kind() == EffectKind::Particle
    }

    pub fn is_roadsign(&self) -> bool {
        self.kind() == EffectKind::Roadsign
    }

    pub fn is_escalator(&self) -> bool {
        self.kind() == EffectKind::Escalator
    }

    /// Detach the record from the owning model
    ///
    /// The record's resources are untouched; final teardown stays with
    /// whoever owns the record's storage.
    pub fn destroy(&self, info: &mut dyn ModelInfo) -> bool {
        info.remove_effect(&self.record)
    }

    // ---- common ----

    pub fn position(&self) -> Vec3 {
        self.record.read().position
    }

    pub fn set_position(&self, position: Vec3) {
        self.record.write().position = position;
    }

    // ---- light ----

    fn light<T: Default>(&self, get: impl FnOnce(&Light) -> T) -> T {
        self.record.read().as_light().map(get).unwrap_or_default()
    }

    fn light_mut(&self, set: impl FnOnce(&mut Light)) {
        if let Some(light) = self.record.write().as_light_mut() {
            set(light);
        }
    }

    pub fn draw_distance(&self) -> f32 {
        self.light(|light| light.corona_far_clip)
    }

    pub fn set_draw_distance(&self, value: f32) {
        self.light_mut(|light| light.corona_far_clip = value);
    }

    pub fn light_range(&self) -> f32 {
        self.light(|light| light.point_light_range)
    }

    pub fn set_light_range(&self, value: f32) {
        self.light_mut(|light| light.point_light_range = value);
    }

    pub fn corona_size(&self) -> f32 {
        self.light(|light| light.corona_size)
    }

    pub fn set_corona_size(&self, value: f32) {
        self.light_mut(|light| light.corona_size = value);
    }

    pub fn shadow_size(&self) -> f32 {
        self.light(|light| light.shadow_size)
    }

    pub fn set_shadow_size(&self, value: f32) {
        self.light_mut(|light| light.shadow_size = value);
    }

    pub fn shadow_multiplier(&self) -> u8 {
        self.light(|light| light.shadow_color_multiplier)
    }

    pub fn set_shadow_multiplier(&self, value: u8) {
        self.light_mut(|light| light.shadow_color_multiplier = value);
    }

    pub fn flash_type(&self) -> CoronaFlashType {
        self.light(|light| light.flash_type)
    }

    pub fn set_flash_type(&self, value: CoronaFlashType) {
        self.light_mut(|light| light.flash_type = value);
    }

    pub fn corona_reflection(&self) -> bool {
        self.light(|light| light.corona_reflection)
    }

    pub fn set_corona_reflection(&self, value: bool) {
        self.light_mut(|light| light.corona_reflection = value);
    }

    pub fn flare_type(&self) -> u8 {
        self.light(|light| light.flare_type)
    }

    pub fn set_flare_type(&self, value: u8) {
        self.light_mut(|light| light.flare_type = value);
    }

    pub fn light_flags(&self) -> u16 {
        self.light(|light| light.flags)
    }

    pub fn set_light_flags(&self, value: u16) {
        self.light_mut(|light| light.flags = value);
    }

    pub fn shadow_distance(&self) -> i8 {
        self.light(|light| light.shadow_z_distance)
    }

    pub fn set_shadow_distance(&self, value: i8) {
        self.light_mut(|light| light.shadow_z_distance = value);
    }

    pub fn offset(&self) -> [i8; 3] {
        self.light(|light| light.offset)
    }

    pub fn set_offset(&self, value: [i8; 3]) {
        self.light_mut(|light| light.offset = value);
    }

    pub fn color(&self) -> Color {
        self.light(|light| light.color)
    }

    pub fn set_color(&self, value: Color) {
        self.light_mut(|light| light.color = value);
    }

    pub fn corona_texture_name(&self) -> String {
        self.light(|light| {
            light
                .corona_tex
                .as_ref()
                .map(|tex| tex.name().to_string())
                .unwrap_or_default()
        })
    }

    /// Replace the corona texture, releasing the previous one
    ///
    /// Unknown names are not applied; a failed load leaves the slot
    /// empty.
    pub fn set_corona_texture(&self, engine: &mut dyn GfxEngine, name: &str) {
        if !TextureName::is_known(name) {
            return;
        }
        if let Some(light) = self.record.write().as_light_mut() {
            prepare_light_textures(
                engine,
                &mut light.corona_tex,
                &mut light.shadow_tex,
                Some(name),
                None,
                true,
            );
        }
    }

    pub fn shadow_texture_name(&self) -> String {
        self.light(|light| {
            light
                .shadow_tex
                .as_ref()
                .map(|tex| tex.name().to_string())
                .unwrap_or_default()
        })
    }

    pub fn set_shadow_texture(&self, engine: &mut dyn GfxEngine, name: &str) {
        if !TextureName::is_known(name) {
            return;
        }
        if let Some(light) = self.record.write().as_light_mut() {
            prepare_light_textures(
                engine,
                &mut light.corona_tex,
                &mut light.shadow_tex,
                None,
                Some(name),
                true,
            );
        }
    }

    // ---- particle ----

    pub fn particle_name(&self) -> String {
        self.record
            .read()
            .as_particle()
            .map(|particle| particle.name().to_string())
            .unwrap_or_default()
    }

    pub fn set_particle_name(&self, name: &str) {
        if let Some(particle) = self.record.write().as_particle_mut() {
            particle.set_name(name);
        }
    }

    // ---- roadsign ----

    fn sign<T: Default>(&self, get: impl FnOnce(&Roadsign) -> T) -> T {
        self.record.read().as_roadsign().map(get).unwrap_or_default()
    }

    fn sign_mut(&self, set: impl FnOnce(&mut Roadsign)) {
        if let Some(sign) = self.record.write().as_roadsign_mut() {
            set(sign);
        }
    }

    pub fn roadsign_size(&self) -> Vec2 {
        self.sign(|sign| sign.size)
    }

    pub fn set_roadsign_size(&self, value: Vec2) {
        self.sign_mut(|sign| sign.size = value);
    }

    pub fn roadsign_rotation(&self) -> Vec3 {
        self.sign(|sign| sign.rotation)
    }

    pub fn set_roadsign_rotation(&self, value: Vec3) {
        self.sign_mut(|sign| sign.rotation = value);
    }

    pub fn roadsign_flags(&self) -> u8 {
        self.sign(|sign| sign.flags)
    }

    pub fn set_roadsign_flags(&self, value: u8) {
        self.sign_mut(|sign| sign.flags = value);
    }

    pub fn roadsign_text_line(&self, line: u8) -> String {
        self.sign(|sign| {
            sign.text
                .as_ref()
                .map(|text| text.line(line).to_string())
                .unwrap_or_default()
        })
    }

    /// Write one text line (1-based) and rebuild the visual
    pub fn set_roadsign_text(&self, engine: &mut dyn GfxEngine, line: u8, text: &str) {
        let mut record = self.record.write();
        let position = record.position;
        let Some(sign) = record.as_roadsign_mut() else {
            return;
        };
        sign.text
            .get_or_insert_with(RoadsignText::new)
            .set_line(line, text);
        rebuild_sign_visual(engine, position, sign);
    }

    // ---- escalator ----

    fn escalator<T: Default>(&self, get: impl FnOnce(&Escalator) -> T) -> T {
        self.record
            .read()
            .as_escalator()
            .map(get)
            .unwrap_or_default()
    }

    fn escalator_mut(&self, set: impl FnOnce(&mut Escalator)) {
        if let Some(escalator) = self.record.write().as_escalator_mut() {
            set(escalator);
        }
    }

    pub fn escalator_bottom(&self) -> Vec3 {
        self.escalator(|escalator| escalator.bottom)
    }

    pub fn set_escalator_bottom(&self, value: Vec3) {
        self.escalator_mut(|escalator| escalator.bottom = value);
    }

    pub fn escalator_top(&self) -> Vec3 {
        self.escalator(|escalator| escalator.top)
    }

    pub fn set_escalator_top(&self, value: Vec3) {
        self.escalator_mut(|escalator| escalator.top = value);
    }

    pub fn escalator_end(&self) -> Vec3 {
        self.escalator(|escalator| escalator.end)
    }

    pub fn set_escalator_end(&self, value: Vec3) {
        self.escalator_mut(|escalator| escalator.end = value);
    }

    pub fn escalator_direction(&self) -> u8 {
        self.escalator(|escalator| escalator.direction)
    }

    pub fn set_escalator_direction(&self, value: u8) {
        self.escalator_mut(|escalator| escalator.direction = value);
    }
}

/// Tear down and rebuild a sign's visual from its current fields
pub(crate) fn rebuild_sign_visual(engine: &mut dyn GfxEngine, position: Vec3, sign: &mut Roadsign) {
    roadsign::destroy_visual(engine, sign);
    let text = sign.text.clone().unwrap_or_default();
    sign.atomic = roadsign::build_visual(
        engine,
        position,
        sign.rotation,
        sign.size,
        sign.flags,
        &text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use dfx_core::mock::MockEngine;
    use dfx_core::record::EffectRecord;
    use parking_lot::RwLock;

    fn handle_of(kind: EffectKind) -> EffectHandle {
        let record = Arc::new(RwLock::new(EffectRecord::new(Vec3::new(1.0, 2.0, 3.0), kind)));
        EffectHandle::new(EffectId(1), 400, record)
    }

    #[test]
    fn test_position_is_kind_independent() {
        let handle = handle_of(EffectKind::CoverPoint);
        assert_eq!(handle.position(), Vec3::new(1.0, 2.0, 3.0));
        handle.set_position(Vec3::ZERO);
        assert_eq!(handle.position(), Vec3::ZERO);
    }

    #[test]
    fn test_light_accessors_roundtrip() {
        let handle = handle_of(EffectKind::Light);
        assert!(handle.is_light());

        handle.set_draw_distance(120.0);
        handle.set_light_range(40.0);
        handle.set_corona_size(2.0);
        handle.set_shadow_size(6.0);
        handle.set_shadow_multiplier(80);
        handle.set_flash_type(CoronaFlashType::TrafficLight);
        handle.set_corona_reflection(true);
        handle.set_flare_type(1);
        handle.set_light_flags(3);
        handle.set_shadow_distance(-4);
        handle.set_offset([1, 0, -1]);
        handle.set_color(Color::new(10, 20, 30, 255));

        assert_eq!(handle.draw_distance(), 120.0);
        assert_eq!(handle.light_range(), 40.0);
        assert_eq!(handle.corona_size(), 2.0);
        assert_eq!(handle.shadow_size(), 6.0);
        assert_eq!(handle.shadow_multiplier(), 80);
        assert_eq!(handle.flash_type(), CoronaFlashType::TrafficLight);
        assert!(handle.corona_reflection());
        assert_eq!(handle.flare_type(), 1);
        assert_eq!(handle.light_flags(), 3);
        assert_eq!(handle.shadow_distance(), -4);
        assert_eq!(handle.offset(), [1, 0, -1]);
        assert_eq!(handle.color(), Color::new(10, 20, 30, 255));
    }

    #[test]
    fn test_mismatched_kind_defaults_and_no_ops() {
        let handle = handle_of(EffectKind::Particle);

        handle.set_corona_size(9.0);
        handle.set_roadsign_flags(7);
        handle.set_escalator_direction(1);

        assert_eq!(handle.corona_size(), 0.0);
        assert_eq!(handle.corona_texture_name(), "");
        assert_eq!(handle.roadsign_size(), Vec2::ZERO);
        assert_eq!(handle.roadsign_text_line(1), "");
        assert_eq!(handle.escalator_bottom(), Vec3::ZERO);
        assert_eq!(handle.escalator_direction(), 0);

        handle.set_particle_name("smoke_flare");
        assert_eq!(handle.particle_name(), "smoke_flare");
    }

    #[test]
    fn test_texture_setter_releases_previous() {
        let mut engine = MockEngine::new();
        engine.register_group(
            dfx_core::engine::PARTICLE_GROUP,
            ["coronastar", "coronamoon"],
        );
        let handle = handle_of(EffectKind::Light);

        handle.set_corona_texture(&mut engine, "coronastar");
        assert_eq!(handle.corona_texture_name(), "coronastar");
        handle.set_corona_texture(&mut engine, "coronamoon");
        assert_eq!(handle.corona_texture_name(), "coronamoon");
        assert_eq!(engine.live_texture_count(), 1);
        assert_eq!(engine.double_destroys, 0);

        // unknown names are rejected before the engine is consulted
        handle.set_corona_texture(&mut engine, "nonsense");
        assert_eq!(handle.corona_texture_name(), "coronamoon");
    }

    #[test]
    fn test_set_roadsign_text_rebuilds_visual() {
        let mut engine = MockEngine::new();
        let handle = handle_of(EffectKind::Roadsign);

        handle.set_roadsign_text(&mut engine, 1, "DETOUR");
        assert_eq!(handle.roadsign_text_line(1), "DETOUR");
        assert_eq!(engine.live_atomic_count(), 1);
        let first = handle.record().read().as_roadsign().unwrap().atomic.as_ref().map(|a| a.id());

        handle.set_roadsign_text(&mut engine, 2, "AHEAD");
        assert_eq!(handle.roadsign_text_line(2), "AHEAD");
        assert_eq!(engine.live_atomic_count(), 1);
        let second = handle.record().read().as_roadsign().unwrap().atomic.as_ref().map(|a| a.id());
        assert_ne!(first, second);
        assert_eq!(engine.double_destroys, 0);
    }
}
