//! Axis identifiers.

/// One independently driven direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Electromagnet lift.
    Z,
    /// Gantry X.
    X,
    /// Gantry Y.
    Y,
}

impl Axis {
    /// All axes, in firmware order.
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::X, Axis::Y];

    /// Axes with a limit switch, homed by `AUTOCALIB`.
    pub const HOMED: [Axis; 2] = [Axis::X, Axis::Y];

    /// Lowercase protocol name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::Z => "z",
            Axis::X => "x",
            Axis::Y => "y",
        }
    }

    /// Parse a protocol axis letter (`x`, `y`, `z`).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'z' => Some(Axis::Z),
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            _ => None,
        }
    }
}
