use serde::{Deserialize, Serialize};

use super::Rgba8;

/// Gradient spread behavior outside the [0, 1] range.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    #[default]
    Pad,
    /// Mirror-repeat the gradient pattern.
    Reflect,
    /// Repeat the gradient pattern.
    Repeat,
}

/// A single gradient stop.
///
/// `position` is nominally in [0, 1] but is not validated here; the engine
/// decides what to do with out-of-range stops.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgba8,
}

impl GradientStop {
    #[inline]
    pub const fn new(position: f32, color: Rgba8) -> Self {
        Self { position, color }
    }
}

/// Ordered stop list. Wire form: `{"stops": [...]}`.
///
/// Stop order is caller-determined and preserved exactly; nothing on this
/// side sorts or deduplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    #[inline]
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Self { stops }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

impl FromIterator<GradientStop> for Gradient {
    fn from_iter<I: IntoIterator<Item = GradientStop>>(iter: I) -> Self {
        Self { stops: iter.into_iter().collect() }
    }
}
