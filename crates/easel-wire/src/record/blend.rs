use serde::{Deserialize, Serialize};

/// Layer compositing mode. Wire form is the variant name as a JSON string.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    Dst,
    Src,
    Clear,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
    Add,

    // Separable
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,

    // Non-separable
    Hue,
    Saturation,
    Color,
    Luminosity,
}
