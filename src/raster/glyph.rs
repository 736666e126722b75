//! 8×8 bitmap glyphs.

use crate::error::{EngineError, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width and height of every glyph bitmap, in cells.
pub const GLYPH_SIZE: i32 = 8;

/// Largest block size a glyph cell may be drawn at.
pub const MAX_GLYPH_SCALE: u32 = 64;

// One byte per row, most significant bit = leftmost column.
const GLYPH_A: [u8; 8] = [0x3C, 0x66, 0xC3, 0xFF, 0xC3, 0xC3, 0xC3, 0x00];
const GLYPH_B: [u8; 8] = [0xFE, 0xC3, 0xC3, 0xFE, 0xC3, 0xC3, 0xFE, 0x00];
const GLYPH_C: [u8; 8] = [0x7E, 0xC3, 0xC0, 0xC0, 0xC0, 0xC3, 0x7E, 0x00];

/// Supported glyph identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Glyph {
    A,
    B,
    C,
}

impl Glyph {
    pub const ALL: [Glyph; 3] = [Glyph::A, Glyph::B, Glyph::C];

    pub fn as_char(self) -> char {
        match self {
            Glyph::A => 'A',
            Glyph::B => 'B',
            Glyph::C => 'C',
        }
    }

    /// Row bitmap for this glyph.
    pub fn bitmap(self) -> &'static [u8; 8] {
        match self {
            Glyph::A => &GLYPH_A,
            Glyph::B => &GLYPH_B,
            Glyph::C => &GLYPH_C,
        }
    }

    /// Emits one `scale × scale` block per lit cell, offset by `anchor` (top-left).
    ///
    /// `scale` is clamped to `1..=MAX_GLYPH_SCALE`.
    pub fn pixels(self, anchor: Point, scale: u32) -> Vec<Point> {
        let scale = scale.clamp(1, MAX_GLYPH_SCALE) as i64;
        let bitmap = self.bitmap();
        let mut pixels = Vec::new();

        for (row, bits) in (0i64..).zip(bitmap.iter()) {
            for col in 0..GLYPH_SIZE as i64 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let x = anchor.x as i64 + col * scale + dx;
                        let y = anchor.y as i64 + row * scale + dy;
                        pixels.push(Point::new(saturate(x), saturate(y)));
                    }
                }
            }
        }
        pixels
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl TryFrom<char> for Glyph {
    type Error = EngineError;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Glyph::A),
            'B' => Ok(Glyph::B),
            'C' => Ok(Glyph::C),
            _ => Err(EngineError::InvalidGlyph(c.to_string())),
        }
    }
}

impl FromStr for Glyph {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Glyph::try_from(c),
            _ => Err(EngineError::InvalidGlyph(s.to_string())),
        }
    }
}

impl TryFrom<String> for Glyph {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Glyph> for String {
    fn from(glyph: Glyph) -> Self {
        glyph.as_char().to_string()
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Looks up `glyph_id` in the glyph table and rasterizes it at `anchor`.
pub fn glyph_pixels(anchor: Point, glyph_id: char, scale: u32) -> Result<Vec<Point>> {
    let glyph = Glyph::try_from(glyph_id)?;
    Ok(glyph.pixels(anchor, scale))
}
