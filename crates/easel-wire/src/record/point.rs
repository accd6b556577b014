use serde::{Deserialize, Serialize};

/// 2D point in surface pixels.
///
/// Wire form is a two-element array `[x, y]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl From<[f32; 2]> for Point {
    #[inline]
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Point> for [f32; 2] {
    #[inline]
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}
