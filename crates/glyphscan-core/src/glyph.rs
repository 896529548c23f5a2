//! Intensity glyph alphabet and glyph classes.
//!
//! Grids are produced by an external renderer that quantizes brightness into
//! a short ramp of glyphs, densest first: `█ ▓ ▒ ░ ' '`. Matching treats
//! glyphs of the same class as near-equivalent renderings of one feature.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full-density glyph.
pub const FULL: char = '█';
/// Dark shade glyph.
pub const DARK_SHADE: char = '▓';
/// Medium shade glyph.
pub const MEDIUM_SHADE: char = '▒';
/// Light shade glyph.
pub const LIGHT_SHADE: char = '░';
/// Blank glyph used for padding and clearing.
pub const BLANK: char = ' ';

/// The default intensity ramp, densest first.
pub const RAMP: [char; 5] = [FULL, DARK_SHADE, MEDIUM_SHADE, LIGHT_SHADE, BLANK];

const DARK_GLYPHS: &[char] = &[FULL, DARK_SHADE, MEDIUM_SHADE, '#', '@'];
const LIGHT_GLYPHS: &[char] = &[LIGHT_SHADE, BLANK, '·'];
const BORDER_GLYPHS: &[char] = &[
    '│', '─', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼', '━', '┃', '═', '║', '╔', '╗', '╚',
    '╝', '╠', '╣', '╦', '╩', '╬',
];

/// Glyph class used for tolerant similarity scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GlyphClass {
    /// Dense block glyphs
    Dark,
    /// Faint and blank glyphs
    Light,
    /// Line-drawing glyphs
    Border,
    /// Anything else (text, punctuation)
    Other,
}

/// Classify a single character. Total; never fails.
pub fn classify(ch: char) -> GlyphClass {
    if DARK_GLYPHS.contains(&ch) {
        GlyphClass::Dark
    } else if LIGHT_GLYPHS.contains(&ch) {
        GlyphClass::Light
    } else if BORDER_GLYPHS.contains(&ch) {
        GlyphClass::Border
    } else {
        GlyphClass::Other
    }
}

/// Whether the character is a line-drawing glyph.
pub fn is_border(ch: char) -> bool {
    classify(ch) == GlyphClass::Border
}
