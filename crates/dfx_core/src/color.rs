//! RGBA color with the two packed encodings used at the scripting boundary
//!
//! The property-identifier path packs R into bits 16-23, G into 8-15,
//! B into 0-7 and A into 24-31 (`argb`). The legacy bag path instead
//! mirrors the little-endian byte layout of the R,G,B,A struct, so R lands
//! in bits 0-7 (`abgr`). Both orders are deliberately preserved; the argb
//! order is authoritative for new callers.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode from the authoritative packing: A | R | G | B, high to low
    pub const fn from_argb(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
            a: ((packed >> 24) & 0xFF) as u8,
        }
    }

    /// Encode into the authoritative packing: A | R | G | B, high to low
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24)
            | ((self.r as u32) << 16)
            | ((self.g as u32) << 8)
            | (self.b as u32)
    }

    /// Decode from the legacy bag packing: A | B | G | R, high to low
    pub const fn from_abgr(packed: u32) -> Self {
        Self {
            r: (packed & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: ((packed >> 16) & 0xFF) as u8,
            a: ((packed >> 24) & 0xFF) as u8,
        }
    }

    /// Encode into the legacy bag packing: A | B | G | R, high to low
    pub const fn to_abgr(self) -> u32 {
        ((self.a as u32) << 24)
            | ((self.b as u32) << 16)
            | ((self.g as u32) << 8)
            | (self.r as u32)
    }
}
