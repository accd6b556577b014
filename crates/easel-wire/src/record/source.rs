use serde::{Deserialize, Serialize};

use super::{Gradient, Point, Rgba8, SpreadMode};

/// Which paint variant a wire record describes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Solid,
    LinearGradient,
    RadialGradient,
    TwoCircleRadialGradient,
}

/// Paint source for filling or stroking geometry.
///
/// Each variant carries exactly the fields it uses. Conversion to the wire
/// record fills the rest with defaults; see [`crate::normalize::source`].
#[derive(Debug, Clone, PartialEq)]
pub enum PaintSource {
    Solid(Rgba8),
    LinearGradient {
        gradient: Gradient,
        start: Point,
        end: Point,
        spread: SpreadMode,
    },
    RadialGradient {
        gradient: Gradient,
        center: Point,
        radius: f32,
        spread: SpreadMode,
    },
    TwoCircleRadialGradient {
        gradient: Gradient,
        center: Point,
        radius: f32,
        center2: Point,
        radius2: f32,
        spread: SpreadMode,
    },
}

impl PaintSource {
    #[inline]
    pub fn solid(color: Rgba8) -> Self {
        PaintSource::Solid(color)
    }

    #[inline]
    pub fn kind(&self) -> SourceKind {
        match self {
            PaintSource::Solid(_) => SourceKind::Solid,
            PaintSource::LinearGradient { .. } => SourceKind::LinearGradient,
            PaintSource::RadialGradient { .. } => SourceKind::RadialGradient,
            PaintSource::TwoCircleRadialGradient { .. } => SourceKind::TwoCircleRadialGradient,
        }
    }
}

impl From<Rgba8> for PaintSource {
    #[inline]
    fn from(color: Rgba8) -> Self {
        PaintSource::Solid(color)
    }
}

/// Loose paint description as a host might hand it over (e.g. parsed JSON).
///
/// Any subset of the optional fields may be set. `None` means absent; a
/// present zero (`radius: Some(0.0)`) is a real value and survives
/// normalization untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDesc {
    pub src_type: SourceKind,
    #[serde(default)]
    pub color: Option<Rgba8>,
    #[serde(default)]
    pub start: Option<Point>,
    #[serde(default)]
    pub end: Option<Point>,
    #[serde(default)]
    pub center: Option<Point>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub center2: Option<Point>,
    #[serde(default)]
    pub radius2: Option<f32>,
    #[serde(default)]
    pub spread: Option<SpreadMode>,
    #[serde(default)]
    pub gradient: Option<Gradient>,
}

impl SourceDesc {
    /// A description with only the tag set.
    pub fn new(src_type: SourceKind) -> Self {
        Self {
            src_type,
            color: None,
            start: None,
            end: None,
            center: None,
            radius: None,
            center2: None,
            radius2: None,
            spread: None,
            gradient: None,
        }
    }
}

/// Fixed-shape paint record as the engine parses it.
///
/// Every field is required on deserialization: a record missing any of them
/// is a normalization defect, not something to paper over with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireSource {
    pub src_type: SourceKind,
    pub color: Rgba8,
    pub start: Point,
    pub end: Point,
    pub center: Point,
    pub radius: f32,
    pub center2: Point,
    pub radius2: f32,
    pub spread: SpreadMode,
    pub gradient: Gradient,
}

impl WireSource {
    /// Record of the given kind with every field at its documented default.
    pub fn defaults(src_type: SourceKind) -> Self {
        Self {
            src_type,
            color: Rgba8::transparent(),
            start: Point::zero(),
            end: Point::zero(),
            center: Point::zero(),
            radius: 0.0,
            center2: Point::zero(),
            radius2: 0.0,
            spread: SpreadMode::Pad,
            gradient: Gradient::default(),
        }
    }
}
