//! Argument normalization.
//!
//! Turns paint sources and paths into fixed-shape wire records. Every function
//! here is pure and total: the same input always yields the same record, and
//! no surface or registry state is involved.
//!
//! Defaults:
//! - `color`: all-zero rgba
//! - `start`, `end`, `center`, `center2`: `[0, 0]`
//! - `radius`, `radius2`: `0`
//! - `spread`: `Pad`
//! - `gradient`: no stops
//! - path step arrays: zero-filled at arity 2 / 4 / 6 / 5

use crate::record::{
    PaintSource, Path, PathStep, SourceDesc, StepDesc, WirePath, WireSource, WireStep,
};

/// Normalizes a typed paint source.
pub fn source(src: &PaintSource) -> WireSource {
    let mut wire = WireSource::defaults(src.kind());
    match src {
        PaintSource::Solid(color) => {
            wire.color = *color;
        }
        PaintSource::LinearGradient { gradient, start, end, spread } => {
            wire.gradient = gradient.clone();
            wire.start = *start;
            wire.end = *end;
            wire.spread = *spread;
        }
        PaintSource::RadialGradient { gradient, center, radius, spread } => {
            wire.gradient = gradient.clone();
            wire.center = *center;
            wire.radius = *radius;
            wire.spread = *spread;
        }
        PaintSource::TwoCircleRadialGradient {
            gradient,
            center,
            radius,
            center2,
            radius2,
            spread,
        } => {
            wire.gradient = gradient.clone();
            wire.center = *center;
            wire.radius = *radius;
            wire.center2 = *center2;
            wire.radius2 = *radius2;
            wire.spread = *spread;
        }
    }
    wire
}

/// Normalizes a loose paint description. Only `None` is treated as absent.
pub fn source_desc(desc: &SourceDesc) -> WireSource {
    let d = WireSource::defaults(desc.src_type);
    WireSource {
        src_type: desc.src_type,
        color: desc.color.unwrap_or(d.color),
        start: desc.start.unwrap_or(d.start),
        end: desc.end.unwrap_or(d.end),
        center: desc.center.unwrap_or(d.center),
        radius: desc.radius.unwrap_or(d.radius),
        center2: desc.center2.unwrap_or(d.center2),
        radius2: desc.radius2.unwrap_or(d.radius2),
        spread: desc.spread.unwrap_or(d.spread),
        gradient: desc.gradient.clone().unwrap_or(d.gradient),
    }
}

/// Normalizes one typed step.
pub fn step(step: &PathStep) -> WireStep {
    let mut wire = WireStep::zeroed(step.kind());
    match *step {
        PathStep::MoveTo { x, y } | PathStep::LineTo { x, y } => wire.linear = [x, y],
        PathStep::QuadTo { cx, cy, x, y } => wire.quad = [cx, cy, x, y],
        PathStep::Rect { x, y, w, h } => wire.quad = [x, y, w, h],
        PathStep::CubicTo { c1x, c1y, c2x, c2y, x, y } => wire.cubic = [c1x, c1y, c2x, c2y, x, y],
        PathStep::Arc { x, y, r, start, sweep } => wire.arc = [x, y, r, start, sweep],
        PathStep::Close => {}
    }
    wire
}

/// Normalizes one loose step; absent arrays become zero-filled.
pub fn step_desc(desc: &StepDesc) -> WireStep {
    let zero = WireStep::zeroed(desc.path_type);
    WireStep {
        path_type: desc.path_type,
        linear: desc.linear.unwrap_or(zero.linear),
        quad: desc.quad.unwrap_or(zero.quad),
        cubic: desc.cubic.unwrap_or(zero.cubic),
        arc: desc.arc.unwrap_or(zero.arc),
    }
}

/// Normalizes a path, preserving step order.
pub fn path(path: &Path) -> WirePath {
    WirePath { steps: path.steps.iter().map(step).collect() }
}

/// Normalizes a sequence of loose steps, preserving order.
pub fn path_desc(steps: &[StepDesc]) -> WirePath {
    WirePath { steps: steps.iter().map(step_desc).collect() }
}

impl From<&PaintSource> for WireSource {
    #[inline]
    fn from(src: &PaintSource) -> Self {
        source(src)
    }
}

impl From<&SourceDesc> for WireSource {
    #[inline]
    fn from(desc: &SourceDesc) -> Self {
        source_desc(desc)
    }
}

impl From<&Path> for WirePath {
    #[inline]
    fn from(p: &Path) -> Self {
        path(p)
    }
}
