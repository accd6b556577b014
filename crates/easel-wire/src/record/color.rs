use serde::{Deserialize, Serialize};

/// Straight-alpha 8-bit RGBA color as the engine reads it.
///
/// Wire form: `{"r":..,"g":..,"b":..,"a":..}`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Components in the `a, r, g, b` order used by the clear operation.
    #[inline]
    pub const fn argb(self) -> [u8; 4] {
        [self.a, self.r, self.g, self.b]
    }

    /// Packs into the engine's native pixel word: `(A << 24) | (R << 16) | (G << 8) | B`.
    #[inline]
    pub const fn to_argb32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}
