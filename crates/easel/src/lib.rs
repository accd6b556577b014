//! Easel: drawing surfaces backed by an external rendering engine.
//!
//! A [`Session`] owns the command channel and its handle registry; every
//! [`Surface`] created from it issues exactly one channel call per drawing
//! operation. Protocol types are re-exported from `easel-wire`.

pub mod config;
pub mod logging;
pub mod session;
pub mod surface;

pub use config::EaselConfig;
pub use session::Session;
pub use surface::{Surface, SurfaceState};

pub use easel_wire::record::{
    Angle, BlendMode, Gradient, GradientStop, IntRect, LineCap, LineJoin, PaintSource, Path,
    PathStep, Point, Rgba8, SourceDesc, SourceKind, SpreadMode, StepDesc, StepKind, StrokeStyle,
    Transform, WirePath, WireSource,
};
pub use easel_wire::{normalize, Channel, Error, LoopbackEngine, Op, OpNames, Result, SurfaceId};
