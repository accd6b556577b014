use serde::{Deserialize, Serialize};

/// Rotation angle unit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Angle {
    Degrees(f32),
    Radians(f32),
}

/// Surface transform.
///
/// On the wire a transform is a mode selector followed by six components;
/// modes that need fewer components send zeros in the unused slots.
///
/// | mode | variant       | components                      |
/// |------|---------------|---------------------------------|
/// | 0    | `ColumnMajor` | m11 m21 m31 m12 m22 m32         |
/// | 1    | `RowMajor`    | m11 m12 m21 m22 m31 m32         |
/// | 2    | `Scale`       | sx sy                           |
/// | 3    | `Translate`   | tx ty                           |
/// | 4    | `Rotate`      | unit (0 = degrees, 1 = radians), angle |
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transform {
    ColumnMajor([f32; 6]),
    RowMajor([f32; 6]),
    Scale { x: f32, y: f32 },
    Translate { x: f32, y: f32 },
    Rotate(Angle),
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Transform::RowMajor([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    /// Mode selector and the six components as sent.
    pub fn to_wire(self) -> (u8, [f32; 6]) {
        match self {
            Transform::ColumnMajor(m) => (0, m),
            Transform::RowMajor(m) => (1, m),
            Transform::Scale { x, y } => (2, [x, y, 0.0, 0.0, 0.0, 0.0]),
            Transform::Translate { x, y } => (3, [x, y, 0.0, 0.0, 0.0, 0.0]),
            Transform::Rotate(Angle::Degrees(a)) => (4, [0.0, a, 0.0, 0.0, 0.0, 0.0]),
            Transform::Rotate(Angle::Radians(a)) => (4, [1.0, a, 0.0, 0.0, 0.0, 0.0]),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Integer clip rectangle given by two corners.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct IntRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl IntRect {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_encodes_unit_in_first_slot() {
        assert_eq!(Transform::Rotate(Angle::Degrees(90.0)).to_wire(), (4, [0.0, 90.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(Transform::Rotate(Angle::Radians(1.5)).to_wire(), (4, [1.0, 1.5, 0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn matrix_modes_pass_components_verbatim() {
        let m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(Transform::ColumnMajor(m).to_wire(), (0, m));
        assert_eq!(Transform::RowMajor(m).to_wire(), (1, m));
    }

    #[test]
    fn scale_and_translate_zero_unused_slots() {
        assert_eq!(Transform::Scale { x: 2.0, y: 3.0 }.to_wire(), (2, [2.0, 3.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(Transform::Translate { x: -1.0, y: 8.0 }.to_wire(), (3, [-1.0, 8.0, 0.0, 0.0, 0.0, 0.0]));
    }
}
