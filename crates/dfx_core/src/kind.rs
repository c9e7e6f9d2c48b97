//! Wire enumerations for 2D effects
//!
//! These enums form the vocabulary shared with the scripting boundary:
//! effect kinds, corona flash modes and the closed set of texture names
//! accepted for light effects.

use serde::{Deserialize, Serialize};

/// Kind tag for an effect record
///
/// Values and ordering follow the on-disk 2dfx format; only `Light`,
/// `Particle`, `Roadsign`, `Escalator` and `SunGlare` carry meaning in
/// this core, the rest exist so native effect arrays round-trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EffectKind {
    Light = 0,
    Particle,
    Unknown,
    Attractor,
    SunGlare,
    Furniture,
    EntryExit,
    Roadsign,
    TriggerPoint,
    CoverPoint,
    Escalator,

    None,
}

impl EffectKind {
    /// Kinds that accept a property bag beyond bare position
    pub fn has_properties(&self) -> bool {
        matches!(
            self,
            Self::Light | Self::Particle | Self::Roadsign | Self::Escalator
        )
    }

    /// Kinds the scripting surface allows creating
    pub fn is_creatable(&self) -> bool {
        self.has_properties() || *self == Self::SunGlare
    }

    /// Script-facing name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Particle => "particle",
            Self::Unknown => "unknown",
            Self::Attractor => "attractor",
            Self::SunGlare => "sun_glare",
            Self::Furniture => "furniture",
            Self::EntryExit => "enex",
            Self::Roadsign => "roadsign",
            Self::TriggerPoint => "trigger_point",
            Self::CoverPoint => "cover_point",
            Self::Escalator => "escalator",
            Self::None => "none",
        }
    }

    /// Resolve a script-facing name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "particle" => Some(Self::Particle),
            "unknown" => Some(Self::Unknown),
            "attractor" => Some(Self::Attractor),
            "sun_glare" => Some(Self::SunGlare),
            "furniture" => Some(Self::Furniture),
            "enex" => Some(Self::EntryExit),
            "roadsign" => Some(Self::Roadsign),
            "trigger_point" => Some(Self::TriggerPoint),
            "cover_point" => Some(Self::CoverPoint),
            "escalator" => Some(Self::Escalator),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flash behaviour of a light corona
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CoronaFlashType {
    #[default]
    Default = 0,
    Random,
    RandomWhenWet,
    AnimSpeed4x,
    AnimSpeed2x,
    AnimSpeed1x,
    /// Used on model nt_roadblockci
    WarnLight,
    TrafficLight,
    TrainCrossing,
    Unused,
    OnlyRain,
    On5Off5,
    On6Off4,
    On4Off6,
}

impl CoronaFlashType {
    /// Script-facing name, matching the 2dfx section strings
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Random => "RANDOM",
            Self::RandomWhenWet => "RANDOM_WHEN_WET",
            Self::AnimSpeed4x => "ANIM_SPEED_4X",
            Self::AnimSpeed2x => "ANIM_SPEED_2X",
            Self::AnimSpeed1x => "ANIM_SPEED_1X",
            Self::WarnLight => "WARNLIGHT",
            Self::TrafficLight => "TRAFFICLIGHT",
            Self::TrainCrossing => "TRAINCROSSING",
            Self::Unused => "UNUSED",
            Self::OnlyRain => "ONLY_RAIN",
            Self::On5Off5 => "ON5_OFF5",
            Self::On6Off4 => "ON6_OFF4",
            Self::On4Off6 => "ON4_OFF6",
        }
    }

    /// Resolve a script-facing name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DEFAULT" => Some(Self::Default),
            "RANDOM" => Some(Self::Random),
            "RANDOM_WHEN_WET" => Some(Self::RandomWhenWet),
            "ANIM_SPEED_4X" => Some(Self::AnimSpeed4x),
            "ANIM_SPEED_2X" => Some(Self::AnimSpeed2x),
            "ANIM_SPEED_1X" => Some(Self::AnimSpeed1x),
            "WARNLIGHT" => Some(Self::WarnLight),
            "TRAFFICLIGHT" => Some(Self::TrafficLight),
            "TRAINCROSSING" => Some(Self::TrainCrossing),
            "UNUSED" => Some(Self::Unused),
            "ONLY_RAIN" => Some(Self::OnlyRain),
            "ON5_OFF5" => Some(Self::On5Off5),
            "ON6_OFF4" => Some(Self::On6Off4),
            "ON4_OFF6" => Some(Self::On4Off6),
            _ => None,
        }
    }
}

impl core::fmt::Display for CoronaFlashType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Closed set of texture names accepted for corona and shadow textures
///
/// The set is validation-only: the record stores the engine texture
/// handle, never this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureName {
    CoronaStar,
    CoronaMoon,
    CoronaReflect,
    CoronaHeadlightLine,
    CoronaRingA,
    ShadExp,
    ShadCar,
    ShadPed,
    ShadHeli,
    ShadBike,
    ShadRcBaron,
    ShadTrain,
}

impl TextureName {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CoronaStar => "coronastar",
            Self::CoronaMoon => "coronamoon",
            Self::CoronaReflect => "coronareflect",
            Self::CoronaHeadlightLine => "coronaheadlightline",
            Self::CoronaRingA => "coronaringa",
            Self::ShadExp => "shad_exp",
            Self::ShadCar => "shad_car",
            Self::ShadPed => "shad_ped",
            Self::ShadHeli => "shad_heli",
            Self::ShadBike => "shad_bike",
            Self::ShadRcBaron => "shad_rcbaron",
            Self::ShadTrain => "shad_train",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "coronastar" => Some(Self::CoronaStar),
            "coronamoon" => Some(Self::CoronaMoon),
            "coronareflect" => Some(Self::CoronaReflect),
            "coronaheadlightline" => Some(Self::CoronaHeadlightLine),
            "coronaringa" => Some(Self::CoronaRingA),
            "shad_exp" => Some(Self::ShadExp),
            "shad_car" => Some(Self::ShadCar),
            "shad_ped" => Some(Self::ShadPed),
            "shad_heli" => Some(Self::ShadHeli),
            "shad_bike" => Some(Self::ShadBike),
            "shad_rcbaron" => Some(Self::ShadRcBaron),
            "shad_train" => Some(Self::ShadTrain),
            _ => None,
        }
    }

    /// Check a name against the closed set
    pub fn is_known(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}
