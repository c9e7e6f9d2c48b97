//! Property identifiers
//!
//! Internally every property is one of these enumerated identifiers;
//! free-form string keys exist only at the external boundary and resolve
//! here on the way in.

use dfx_core::kind::EffectKind;
use serde::{Deserialize, Serialize};

/// Identifier of one effect property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectProperty {
    // light
    FarClipDistance,
    LightRange,
    CoronaSize,
    ShadowSize,
    ShadowMult,
    FlashType,
    CoronaReflection,
    FlareType,
    ShadowDistance,
    OffsetX,
    OffsetY,
    OffsetZ,
    Color,
    CoronaName,
    ShadowName,
    /// Shared by light and roadsign
    Flags,

    // particle
    PrtName,

    // roadsign
    SizeX,
    SizeY,
    RotX,
    RotY,
    RotZ,
    Text,
    Text2,
    Text3,
    Text4,

    // escalator
    BottomX,
    BottomY,
    BottomZ,
    TopX,
    TopY,
    TopZ,
    EndX,
    EndY,
    EndZ,
    Direction,
}

/// All properties, in identifier order
pub const ALL_PROPERTIES: &[EffectProperty] = &[
    EffectProperty::FarClipDistance,
    EffectProperty::LightRange,
    EffectProperty::CoronaSize,
    EffectProperty::ShadowSize,
    EffectProperty::ShadowMult,
    EffectProperty::FlashType,
    EffectProperty::CoronaReflection,
    EffectProperty::FlareType,
    EffectProperty::ShadowDistance,
    EffectProperty::OffsetX,
    EffectProperty::OffsetY,
    EffectProperty::OffsetZ,
    EffectProperty::Color,
    EffectProperty::CoronaName,
    EffectProperty::ShadowName,
    EffectProperty::Flags,
    EffectProperty::PrtName,
    EffectProperty::SizeX,
    EffectProperty::SizeY,
    EffectProperty::RotX,
    EffectProperty::RotY,
    EffectProperty::RotZ,
    EffectProperty::Text,
    EffectProperty::Text2,
    EffectProperty::Text3,
    EffectProperty::Text4,
    EffectProperty::BottomX,
    EffectProperty::BottomY,
    EffectProperty::BottomZ,
    EffectProperty::TopX,
    EffectProperty::TopY,
    EffectProperty::TopZ,
    EffectProperty::EndX,
    EffectProperty::EndY,
    EffectProperty::EndZ,
    EffectProperty::Direction,
];

impl EffectProperty {
    /// The bag key for this property
    pub fn key(&self) -> &'static str {
        match self {
            Self::FarClipDistance => "draw_distance",
            Self::LightRange => "light_range",
            Self::CoronaSize => "corona_size",
            Self::ShadowSize => "shadow_size",
            Self::ShadowMult => "shadow_multiplier",
            Self::FlashType => "show_mode",
            Self::CoronaReflection => "corona_reflection",
            Self::FlareType => "flare_type",
            Self::ShadowDistance => "shadow_distance",
            Self::OffsetX => "offsetX",
            Self::OffsetY => "offsetY",
            Self::OffsetZ => "offsetZ",
            Self::Color => "color",
            Self::CoronaName => "corona_name",
            Self::ShadowName => "shadow_name",
            Self::Flags => "flags",
            Self::PrtName => "name",
            Self::SizeX => "sizeX",
            Self::SizeY => "sizeY",
            Self::RotX => "rotX",
            Self::RotY => "rotY",
            Self::RotZ => "rotZ",
            Self::Text => "text1",
            Self::Text2 => "text2",
            Self::Text3 => "text3",
            Self::Text4 => "text4",
            Self::BottomX => "bottomX",
            Self::BottomY => "bottomY",
            Self::BottomZ => "bottomZ",
            Self::TopX => "topX",
            Self::TopY => "topY",
            Self::TopZ => "topZ",
            Self::EndX => "endX",
            Self::EndY => "endY",
            Self::EndZ => "endZ",
            Self::Direction => "direction",
        }
    }

    /// Resolve a bag key
    ///
    /// `"text"` is accepted as an alias of `"text1"`: legacy callers used
    /// the bare key for the first roadsign line.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "draw_distance" => Some(Self::FarClipDistance),
            "light_range" => Some(Self::LightRange),
            "corona_size" => Some(Self::CoronaSize),
            "shadow_size" => Some(Self::ShadowSize),
            "shadow_multiplier" => Some(Self::ShadowMult),
            "show_mode" => Some(Self::FlashType),
            "corona_reflection" => Some(Self::CoronaReflection),
            "flare_type" => Some(Self::FlareType),
            "shadow_distance" => Some(Self::ShadowDistance),
            "offsetX" => Some(Self::OffsetX),
            "offsetY" => Some(Self::OffsetY),
            "offsetZ" => Some(Self::OffsetZ),
            "color" => Some(Self::Color),
            "corona_name" => Some(Self::CoronaName),
            "shadow_name" => Some(Self::ShadowName),
            "flags" => Some(Self::Flags),
            "name" => Some(Self::PrtName),
            "sizeX" => Some(Self::SizeX),
            "sizeY" => Some(Self::SizeY),
            "rotX" => Some(Self::RotX),
            "rotY" => Some(Self::RotY),
            "rotZ" => Some(Self::RotZ),
            "text" | "text1" => Some(Self::Text),
            "text2" => Some(Self::Text2),
            "text3" => Some(Self::Text3),
            "text4" => Some(Self::Text4),
            "bottomX" => Some(Self::BottomX),
            "bottomY" => Some(Self::BottomY),
            "bottomZ" => Some(Self::BottomZ),
            "topX" => Some(Self::TopX),
            "topY" => Some(Self::TopY),
            "topZ" => Some(Self::TopZ),
            "endX" => Some(Self::EndX),
            "endY" => Some(Self::EndY),
            "endZ" => Some(Self::EndZ),
            "direction" => Some(Self::Direction),
            _ => None,
        }
    }

    /// Whether this property exists on records of `kind`
    pub fn applies_to(&self, kind: EffectKind) -> bool {
        match self {
            Self::FarClipDistance
            | Self::LightRange
            | Self::CoronaSize
            | Self::ShadowSize
            | Self::ShadowMult
            | Self::FlashType
            | Self::CoronaReflection
            | Self::FlareType
            | Self::ShadowDistance
            | Self::OffsetX
            | Self::OffsetY
            | Self::OffsetZ
            | Self::Color
            | Self::CoronaName
            | Self::ShadowName => kind == EffectKind::Light,
            Self::Flags => kind == EffectKind::Light || kind == EffectKind::Roadsign,
            Self::PrtName => kind == EffectKind::Particle,
            Self::SizeX
            | Self::SizeY
            | Self::RotX
            | Self::RotY
            | Self::RotZ
            | Self::Text
            | Self::Text2
            | Self::Text3
            | Self::Text4 => kind == EffectKind::Roadsign,
            Self::BottomX
            | Self::BottomY
            | Self::BottomZ
            | Self::TopX
            | Self::TopY
            | Self::TopZ
            | Self::EndX
            | Self::EndY
            | Self::EndZ
            | Self::Direction => kind == EffectKind::Escalator,
        }
    }

    /// Properties readable from records of `kind`, in bag order
    pub fn properties_of(kind: EffectKind) -> &'static [EffectProperty] {
        match kind {
            EffectKind::Light => &[
                Self::FarClipDistance,
                Self::LightRange,
                Self::CoronaSize,
                Self::ShadowSize,
                Self::ShadowMult,
                Self::FlashType,
                Self::CoronaReflection,
                Self::FlareType,
                Self::Flags,
                Self::ShadowDistance,
                Self::OffsetX,
                Self::OffsetY,
                Self::OffsetZ,
                Self::Color,
                Self::CoronaName,
                Self::ShadowName,
            ],
            EffectKind::Particle => &[Self::PrtName],
            EffectKind::Roadsign => &[
                Self::SizeX,
                Self::SizeY,
                Self::RotX,
                Self::RotY,
                Self::RotZ,
                Self::Flags,
                Self::Text,
                Self::Text2,
                Self::Text3,
                Self::Text4,
            ],
            EffectKind::Escalator => &[
                Self::BottomX,
                Self::BottomY,
                Self::BottomZ,
                Self::TopX,
                Self::TopY,
                Self::TopZ,
                Self::EndX,
                Self::EndY,
                Self::EndZ,
                Self::Direction,
            ],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for property in ALL_PROPERTIES {
            assert_eq!(EffectProperty::from_key(property.key()), Some(*property));
        }
        assert_eq!(EffectProperty::from_key("bogus"), None);
    }

    #[test]
    fn test_text_alias() {
        assert_eq!(EffectProperty::from_key("text"), Some(EffectProperty::Text));
        assert_eq!(EffectProperty::from_key("text1"), Some(EffectProperty::Text));
    }

    #[test]
    fn test_flags_spans_two_kinds() {
        assert!(EffectProperty::Flags.applies_to(EffectKind::Light));
        assert!(EffectProperty::Flags.applies_to(EffectKind::Roadsign));
        assert!(!EffectProperty::Flags.applies_to(EffectKind::Escalator));
    }

    #[test]
    fn test_no_property_applies_to_unsupported_kinds() {
        for kind in [
            EffectKind::SunGlare,
            EffectKind::Attractor,
            EffectKind::CoverPoint,
            EffectKind::None,
        ] {
            for property in ALL_PROPERTIES {
                assert!(!property.applies_to(kind), "{property:?} on {kind}");
            }
            assert!(EffectProperty::properties_of(kind).is_empty());
        }
    }
}
