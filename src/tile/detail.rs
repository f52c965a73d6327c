//! Per-tile surface detail drawn on top of the flat triangle fill.

use serde::{Deserialize, Serialize};

/// Extra decoration the rasterizer draws over a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileDetail {
    /// Flat fill only.
    #[default]
    Plain,
    /// One to three small overlapping craters.
    Cratered,
    /// Dappled light/dark noise across the triangle.
    Rough,
}

impl TileDetail {
    /// Returns a short name for the detail (e.g., "plain", "cratered").
    pub const fn short_name(self) -> &'static str {
        match self {
            TileDetail::Plain => "plain",
            TileDetail::Cratered => "cratered",
            TileDetail::Rough => "rough",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain() {
        assert_eq!(TileDetail::default(), TileDetail::Plain);
    }

    #[test]
    fn test_short_names() {
        assert_eq!(TileDetail::Cratered.short_name(), "cratered");
        assert_eq!(TileDetail::Rough.short_name(), "rough");
    }
}
