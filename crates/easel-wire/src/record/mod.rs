//! Argument records that cross the channel.
//!
//! Two layers live here:
//! - typed host-facing values (`PaintSource`, `PathStep`, `Transform`, ...)
//! - fixed-shape wire records (`WireSource`, `WireStep`) whose every field is
//!   always present, because the engine deserializes by field name and has no
//!   optional-field handling of its own
//!
//! Conversion from the first to the second is done by [`crate::normalize`].

pub mod blend;
pub mod color;
pub mod gradient;
pub mod path;
pub mod point;
pub mod source;
pub mod stroke;
pub mod transform;

pub use blend::BlendMode;
pub use color::Rgba8;
pub use gradient::{Gradient, GradientStop, SpreadMode};
pub use path::{Path, PathStep, StepDesc, StepKind, WirePath, WireStep};
pub use point::Point;
pub use source::{PaintSource, SourceDesc, SourceKind, WireSource};
pub use stroke::{LineCap, LineJoin, StrokeStyle};
pub use transform::{Angle, IntRect, Transform};
