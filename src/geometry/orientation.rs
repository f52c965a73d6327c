//! Triangle orientation of a grid cell.

use serde::{Deserialize, Serialize};

/// Which way a triangular cell points.
///
/// The discriminants match the vertical step used by neighbour math:
/// an `Up` cell shares its flat base with the row below it, a `Down`
/// cell with the row above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Orientation {
    /// Apex at the top, base at the bottom.
    Up = -1,
    /// Apex at the bottom, base at the top.
    Down = 1,
}

impl Orientation {
    /// Returns -1 for `Up` and +1 for `Down`.
    pub const fn sign(self) -> isize {
        self as i8 as isize
    }

    /// Returns the other orientation.
    pub const fn flipped(self) -> Orientation {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    /// Returns a short name (e.g., "up", "down").
    pub const fn short_name(self) -> &'static str {
        match self {
            Orientation::Up => "up",
            Orientation::Down => "down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(Orientation::Up.sign(), -1);
        assert_eq!(Orientation::Down.sign(), 1);
    }

    #[test]
    fn test_flipped() {
        assert_eq!(Orientation::Up.flipped(), Orientation::Down);
        assert_eq!(Orientation::Down.flipped().flipped(), Orientation::Down);
    }

    #[test]
    fn test_short_names() {
        assert_eq!(Orientation::Up.short_name(), "up");
        assert_eq!(Orientation::Down.short_name(), "down");
    }
}
