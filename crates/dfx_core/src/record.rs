//! Effect record: one closed sum type per on-model 2D effect
//!
//! The on-disk format is a tagged union; here the tag and payload fuse
//! into [`EffectData`], so exactly one kind's fields (and owned
//! resources) can exist per record by construction.

use glam::{Vec2, Vec3};

use crate::color::Color;
use crate::engine::{AtomicHandle, TextureHandle};
use crate::kind::{CoronaFlashType, EffectKind};

/// Capacity of the inline particle name buffer
pub const PARTICLE_NAME_LEN: usize = 24;

/// Size of the roadsign text buffer
pub const ROADSIGN_TEXT_LEN: usize = 64;

/// Bytes per roadsign text line
pub const ROADSIGN_LINE_LEN: usize = 16;

/// Number of roadsign text lines
pub const ROADSIGN_LINES: usize = 4;

/// A 2D effect attached to a world model
#[derive(Debug, Default)]
pub struct EffectRecord {
    pub position: Vec3,
    pub data: EffectData,
}

impl EffectRecord {
    /// Fresh record of the given kind with zeroed payload
    pub fn new(position: Vec3, kind: EffectKind) -> Self {
        Self {
            position,
            data: EffectData::empty_of_kind(kind),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.data.kind()
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.data {
            EffectData::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.data {
            EffectData::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_particle(&self) -> Option<&Particle> {
        match &self.data {
            EffectData::Particle(particle) => Some(particle),
            _ => None,
        }
    }

    pub fn as_particle_mut(&mut self) -> Option<&mut Particle> {
        match &mut self.data {
            EffectData::Particle(particle) => Some(particle),
            _ => None,
        }
    }

    pub fn as_roadsign(&self) -> Option<&Roadsign> {
        match &self.data {
            EffectData::Roadsign(roadsign) => Some(roadsign),
            _ => None,
        }
    }

    pub fn as_roadsign_mut(&mut self) -> Option<&mut Roadsign> {
        match &mut self.data {
            EffectData::Roadsign(roadsign) => Some(roadsign),
            _ => None,
        }
    }

    pub fn as_escalator(&self) -> Option<&Escalator> {
        match &self.data {
            EffectData::Escalator(escalator) => Some(escalator),
            _ => None,
        }
    }

    pub fn as_escalator_mut(&mut self) -> Option<&mut Escalator> {
        match &mut self.data {
            EffectData::Escalator(escalator) => Some(escalator),
            _ => None,
        }
    }
}

/// Kind tag plus the fields meaningful for that kind
#[derive(Debug, Default)]
pub enum EffectData {
    Light(Light),
    Particle(Particle),
    Roadsign(Roadsign),
    Escalator(Escalator),
    // Position-and-type-only kinds; payloads are out of scope
    Attractor,
    SunGlare,
    Furniture,
    EntryExit,
    TriggerPoint,
    CoverPoint,
    Unknown,
    #[default]
    None,
}

impl EffectData {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Light(_) => EffectKind::Light,
            Self::Particle(_) => EffectKind::Particle,
            Self::Roadsign(_) => EffectKind::Roadsign,
            Self::Escalator(_) => EffectKind::Escalator,
            Self::Attractor => EffectKind::Attractor,
            Self::SunGlare => EffectKind::SunGlare,
            Self::Furniture => EffectKind::Furniture,
            Self::EntryExit => EffectKind::EntryExit,
            Self::TriggerPoint => EffectKind::TriggerPoint,
            Self::CoverPoint => EffectKind::CoverPoint,
            Self::Unknown => EffectKind::Unknown,
            Self::None => EffectKind::None,
        }
    }

    /// Zeroed payload for a kind
    pub fn empty_of_kind(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Light => Self::Light(Light::default()),
            EffectKind::Particle => Self::Particle(Particle::default()),
            EffectKind::Roadsign => Self::Roadsign(Roadsign::default()),
            EffectKind::Escalator => Self::Escalator(Escalator::default()),
            EffectKind::Attractor => Self::Attractor,
            EffectKind::SunGlare => Self::SunGlare,
            EffectKind::Furniture => Self::Furniture,
            EffectKind::EntryExit => Self::EntryExit,
            EffectKind::TriggerPoint => Self::TriggerPoint,
            EffectKind::CoverPoint => Self::CoverPoint,
            EffectKind::Unknown => Self::Unknown,
            EffectKind::None => Self::None,
        }
    }
}

/// Light / corona effect
///
/// The two texture handles are owned: replaced or destroyed only through
/// the lifecycle manager, never shared between records.
#[derive(Debug, Default)]
pub struct Light {
    pub corona_far_clip: f32,
    pub point_light_range: f32,
    pub corona_size: f32,
    pub shadow_size: f32,
    pub shadow_color_multiplier: u8,
    pub flash_type: CoronaFlashType,
    pub corona_reflection: bool,
    pub flare_type: u8,
    pub flags: u16,
    pub shadow_z_distance: i8,
    pub offset: [i8; 3],
    pub color: Color,
    pub corona_tex: Option<TextureHandle>,
    pub shadow_tex: Option<TextureHandle>,
}

impl Light {
    /// Scalar fields only; textures start absent
    pub fn clone_fields(&self) -> Self {
        Self {
            corona_far_clip: self.corona_far_clip,
            point_light_range: self.point_light_range,
            corona_size: self.corona_size,
            shadow_size: self.shadow_size,
            shadow_color_multiplier: self.shadow_color_multiplier,
            flash_type: self.flash_type,
            corona_reflection: self.corona_reflection,
            flare_type: self.flare_type,
            flags: self.flags,
            shadow_z_distance: self.shadow_z_distance,
            offset: self.offset,
            color: self.color,
            corona_tex: None,
            shadow_tex: None,
        }
    }
}

/// Particle emitter effect; the name lives inline in the record
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    name: [u8; PARTICLE_NAME_LEN],
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            name: [0; PARTICLE_NAME_LEN],
        }
    }
}

impl Particle {
    /// Store a name, truncated to fit with a terminating zero
    ///
    /// Truncation backs up to a character boundary so the stored bytes
    /// stay valid UTF-8.
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; PARTICLE_NAME_LEN];
        let mut len = name.len().min(PARTICLE_NAME_LEN - 1);
        while !name.is_char_boundary(len) {
            len -= 1;
        }
        self.name[..len].copy_from_slice(&name.as_bytes()[..len]);
    }

    /// Name up to the first zero byte
    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PARTICLE_NAME_LEN);
        core::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

/// Roadsign effect
#[derive(Debug, Default)]
pub struct Roadsign {
    pub size: Vec2,
    pub rotation: Vec3,
    pub flags: u8,
    /// Owned text buffer, absent until properties are applied
    pub text: Option<RoadsignText>,
    /// Owned scene-graph visual, absent until built
    pub atomic: Option<AtomicHandle>,
}

/// The 64-byte roadsign text buffer: four 16-byte line segments
///
/// Always heap-allocated and zero-initialized; line `i` (1-based)
/// occupies bytes `16*(i-1) .. 16*i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadsignText(Box<[u8; ROADSIGN_TEXT_LEN]>);

impl Default for RoadsignText {
    fn default() -> Self {
        Self(Box::new([0; ROADSIGN_TEXT_LEN]))
    }
}

impl RoadsignText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a line (1-based), bounded to its 16-byte segment
    ///
    /// The segment is cleared first so shorter text does not leave stale
    /// bytes behind; one zero byte is always kept as terminator.
    pub fn set_line(&mut self, line: u8, text: &str) {
        let Some(segment) = self.segment_range(line) else {
            return;
        };
        self.0[segment.clone()].fill(0);
        let len = text.len().min(ROADSIGN_LINE_LEN - 1);
        self.0[segment.start..segment.start + len].copy_from_slice(&text.as_bytes()[..len]);
    }

    /// Read a line (1-based) up to its first zero byte
    pub fn line(&self, line: u8) -> &str {
        let Some(segment) = self.segment_range(line) else {
            return "";
        };
        let bytes = &self.0[segment];
        let end = bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(ROADSIGN_LINE_LEN);
        core::str::from_utf8(&bytes[..end]).unwrap_or("")
    }

    /// First `count` lines, for handing to the geometry builder
    pub fn lines(&self, count: usize) -> Vec<&str> {
        (1..=count.min(ROADSIGN_LINES))
            .map(|i| self.line(i as u8))
            .collect()
    }

    /// Raw 64-byte view; whole-buffer reads are a compatibility concern,
    /// per-line access is the supported interface
    pub fn as_bytes(&self) -> &[u8; ROADSIGN_TEXT_LEN] {
        &self.0
    }

    fn segment_range(&self, line: u8) -> Option<core::ops::Range<usize>> {
        if !(1..=ROADSIGN_LINES as u8).contains(&line) {
            return None;
        }
        let start = ROADSIGN_LINE_LEN * (line as usize - 1);
        Some(start..start + ROADSIGN_LINE_LEN)
    }
}

/// Escalator effect
#[derive(Clone, Copy, Debug, Default)]
pub struct Escalator {
    pub bottom: Vec3,
    pub top: Vec3,
    pub end: Vec3,
    pub direction: u8,
}
