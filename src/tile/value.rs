//! The tile value type and its colour operations.

use std::fmt;
use std::sync::Arc;

use image::Rgba;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TileDetail;
use crate::dice::Dice;

/// Colour jitter applied to tiles that don't ask for anything else.
const DEFAULT_JITTER: u8 = 3;

/// Errors that can occur while building a tile.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TileError {
    #[error("Invalid colour '{0}': expected #RRGGBB")]
    InvalidColour(String),
}

/// Clamps a colour channel to 1..=254.
///
/// Pure black and pure white are reserved for map edges and background,
/// so no tile ever draws with them.
#[inline]
fn channel(v: i32) -> u8 {
    v.clamp(1, 254) as u8
}

/// A surface classification for one grid cell.
///
/// Tiles are cheap to clone (the name is shared) and never change after
/// construction; the colour operations all return new tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    name: Arc<str>,
    rgb: [u8; 3],
    opacity: u8,
    is_water: bool,
    jitter: u8,
    detail: TileDetail,
}

impl Default for Tile {
    fn default() -> Self {
        Self::new("Grey", [0x77, 0x77, 0x77], false)
    }
}

impl Tile {
    /// Creates an opaque tile with the default colour jitter.
    pub fn new(name: &str, rgb: [u8; 3], is_water: bool) -> Self {
        Self {
            name: Arc::from(name),
            rgb,
            opacity: 0xFF,
            is_water,
            jitter: DEFAULT_JITTER,
            detail: TileDetail::Plain,
        }
    }

    /// Creates a tile from a `#RRGGBB` colour string.
    pub fn from_hex(name: &str, hex: &str, is_water: bool) -> Result<Self, TileError> {
        Ok(Self::new(name, parse_hex(hex)?, is_water))
    }

    /// Creates a greyscale tile, used to visualise height maps.
    ///
    /// Grey levels are capped to 1..=254 and the tile has no jitter.
    pub fn grey(level: i32, is_water: bool) -> Self {
        let g = channel(level);
        Self {
            name: Arc::from(format!("G{}", g)),
            rgb: [g, g, g],
            opacity: 0xFF,
            is_water,
            jitter: 0,
            detail: TileDetail::Plain,
        }
    }

    /// Returns a copy of this tile with a different colour jitter.
    pub fn with_jitter(mut self, jitter: u8) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns a copy of this tile with a different opacity.
    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    /// Returns a copy of this tile with a surface detail overlay.
    pub fn with_detail(mut self, detail: TileDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Shorthand for a cratered copy of this tile.
    pub fn cratered(&self) -> Self {
        self.clone().with_detail(TileDetail::Cratered)
    }

    /// Shorthand for a rough copy of this tile.
    pub fn rough(&self) -> Self {
        self.clone().with_detail(TileDetail::Rough)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn is_water(&self) -> bool {
        self.is_water
    }

    pub fn jitter(&self) -> u8 {
        self.jitter
    }

    pub fn detail(&self) -> TileDetail {
        self.detail
    }

    /// True if both tiles are the same kind of terrain.
    ///
    /// Kinds are identified by name, so shaded or jittered variants of a
    /// tile still count as that tile.
    pub fn same_kind(&self, other: &Tile) -> bool {
        self.name == other.name
    }

    /// Returns a darker (`percent < 100`) or lighter (`percent > 100`) tile.
    pub fn shaded(&self, percent: u32) -> Self {
        let shade = |c: u8| channel((c as u32 * percent / 100) as i32);
        Self {
            rgb: self.rgb.map(shade),
            ..self.clone()
        }
    }

    /// Returns a variant whose channels are all offset by `delta`.
    pub fn variant(&self, delta: i32) -> Self {
        Self {
            rgb: self.rgb.map(|c| channel(c as i32 + delta)),
            ..self.clone()
        }
    }

    /// Returns a tile whose colour is the average of both tiles.
    ///
    /// The result keeps this tile's name and flags.
    pub fn mix(&self, other: &Tile) -> Self {
        let mut rgb = [0u8; 3];
        for (i, c) in rgb.iter_mut().enumerate() {
            *c = channel((self.rgb[i] as i32 + other.rgb[i] as i32) / 2);
        }
        Self { rgb, ..self.clone() }
    }

    /// Returns this tile's colour scaled by `factor`, without building a tile.
    pub fn shifted_rgb(&self, factor: f64) -> [u8; 3] {
        self.rgb.map(|c| channel((c as f64 * factor) as i32))
    }

    /// The tile colour with no jitter applied.
    pub fn rgba(&self) -> Rgba<u8> {
        let [r, g, b] = self.rgb.map(|c| channel(c as i32));
        Rgba([r, g, b, self.opacity])
    }

    /// The tile colour with per-channel jitter, as drawn on a map.
    pub fn jittered_rgba<R: Rng>(&self, rng: &mut R) -> Rgba<u8> {
        let var = self.jitter as u32;
        let mut out = [0u8; 4];
        for (i, c) in self.rgb.iter().enumerate() {
            out[i] = channel(*c as i32 + rng.die_v(var));
        }
        out[3] = self.opacity;
        Rgba(out)
    }

    /// The tile colour as `#RRGGBB`.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.hex())
    }
}

fn parse_hex(hex: &str) -> Result<[u8; 3], TileError> {
    let invalid = || TileError::InvalidColour(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let mut rgb = [0u8; 3];
    for (i, c) in rgb.iter_mut().enumerate() {
        *c = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
    }
    Ok(rgb)
}
