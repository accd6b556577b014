use serde::{Deserialize, Serialize};

/// Tag of a path step on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Move,
    Line,
    Quad,
    Cubic,
    Arc,
    Rect,
    Close,
}

/// One drawing step of a path.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathStep {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { cx: f32, cy: f32, x: f32, y: f32 },
    CubicTo { c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32 },
    /// Arc around `(x, y)` with radius `r`, from `start` sweeping `sweep` radians.
    Arc { x: f32, y: f32, r: f32, start: f32, sweep: f32 },
    /// Closed axis-aligned rectangle sub-path.
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Close,
}

impl PathStep {
    #[inline]
    pub fn kind(&self) -> StepKind {
        match self {
            PathStep::MoveTo { .. } => StepKind::Move,
            PathStep::LineTo { .. } => StepKind::Line,
            PathStep::QuadTo { .. } => StepKind::Quad,
            PathStep::CubicTo { .. } => StepKind::Cubic,
            PathStep::Arc { .. } => StepKind::Arc,
            PathStep::Rect { .. } => StepKind::Rect,
            PathStep::Close => StepKind::Close,
        }
    }
}

/// Ordered step sequence. Order is drawing order and is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub steps: Vec<PathStep>,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, step: PathStep) -> &mut Self {
        self.steps.push(step);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl From<Vec<PathStep>> for Path {
    #[inline]
    fn from(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }
}

impl FromIterator<PathStep> for Path {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        Self { steps: iter.into_iter().collect() }
    }
}

/// Loose step description; any of the four arrays may be missing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDesc {
    pub path_type: StepKind,
    #[serde(default)]
    pub linear: Option<[f32; 2]>,
    #[serde(default)]
    pub quad: Option<[f32; 4]>,
    #[serde(default)]
    pub cubic: Option<[f32; 6]>,
    #[serde(default)]
    pub arc: Option<[f32; 5]>,
}

/// Fixed-shape step record: all four arrays always present at fixed arity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WireStep {
    pub path_type: StepKind,
    pub linear: [f32; 2],
    pub quad: [f32; 4],
    pub cubic: [f32; 6],
    pub arc: [f32; 5],
}

impl WireStep {
    /// Step of the given kind with every array zero-filled.
    #[inline]
    pub const fn zeroed(path_type: StepKind) -> Self {
        Self {
            path_type,
            linear: [0.0; 2],
            quad: [0.0; 4],
            cubic: [0.0; 6],
            arc: [0.0; 5],
        }
    }
}

/// Wire form of a path: `{"steps": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WirePath {
    pub steps: Vec<WireStep>,
}
