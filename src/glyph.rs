//! Bitmap glyphs: jersey digits and mood faces
//!
//! Glyphs are stencils made of `'0'`/`'1'` rows. The built-in tables are
//! checked during const evaluation, so a ragged row fails the build instead
//! of a goal celebration.

use crate::error::{Error, Result};

/// Rectangular boolean bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: &'static [&'static str],
    width: usize,
    height: usize,
}

impl Glyph {
    /// Validate `rows` and wrap them as a glyph
    ///
    /// Every row must have the same non-zero length and contain only `'0'`
    /// and `'1'`.
    pub const fn new(rows: &'static [&'static str]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::MalformedGlyph { row: 0 });
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(Error::MalformedGlyph { row: 0 });
        }

        let mut y = 0;
        while y < rows.len() {
            let cells = rows[y].as_bytes();
            if cells.len() != width {
                return Err(Error::MalformedGlyph { row: y });
            }
            let mut x = 0;
            while x < cells.len() {
                if cells[x] != b'0' && cells[x] != b'1' {
                    return Err(Error::MalformedGlyph { row: y });
                }
                x += 1;
            }
            y += 1;
        }

        Ok(Self {
            rows,
            width,
            height: rows.len(),
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns if the cell at (x, y) is lit
    ///
    /// Cells outside the glyph are never lit.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.as_bytes().get(x))
            .is_some_and(|cell| *cell == b'1')
    }

    /// Iterate over the lit cells as (x, y) pairs
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.bytes()
                .enumerate()
                .filter(|(_, cell)| *cell == b'1')
                .map(move |(x, _)| (x, y))
        })
    }
}

/// Unwraps a built-in glyph, failing const evaluation if it is malformed
const fn builtin(rows: &'static [&'static str]) -> Glyph {
    match Glyph::new(rows) {
        Ok(glyph) => glyph,
        Err(_) => panic!("malformed built-in glyph"),
    }
}

/// Ten digit glyphs sharing one size
#[derive(Debug, Clone, Copy)]
pub struct DigitFont {
    glyphs: [Glyph; 10],
}

impl DigitFont {
    /// Build a font, checking that all digits share the first digit's size
    pub const fn new(glyphs: [Glyph; 10]) -> Result<Self> {
        let width = glyphs[0].width;
        let height = glyphs[0].height;
        let mut i = 1;
        while i < glyphs.len() {
            if glyphs[i].width != width || glyphs[i].height != height {
                return Err(Error::MalformedGlyph { row: 0 });
            }
            i += 1;
        }
        Ok(Self { glyphs })
    }

    pub const fn width(&self) -> usize {
        self.glyphs[0].width
    }

    pub const fn height(&self) -> usize {
        self.glyphs[0].height
    }

    /// Glyph for a single decimal digit
    pub fn digit(&self, digit: u8) -> Result<&Glyph> {
        self.glyphs.get(usize::from(digit)).ok_or(Error::UnknownGlyph)
    }
}

/// Bold 6x10 digits sized for a 12-row matrix
pub const DIGITS_6X10: DigitFont = match DigitFont::new([
    builtin(&[
        "111111", "110011", "110011", "110011", "110011", "110011", "110011", "110011", "111111",
        "111111",
    ]),
    builtin(&[
        "001100", "011100", "001100", "001100", "001100", "001100", "001100", "001100", "111111",
        "111111",
    ]),
    builtin(&[
        "111111", "111111", "000011", "000011", "111111", "111111", "110000", "110000", "111111",
        "111111",
    ]),
    builtin(&[
        "111111", "111111", "000011", "000011", "001111", "001111", "000011", "000011", "111111",
        "111111",
    ]),
    builtin(&[
        "110011", "110011", "110011", "110011", "111111", "111111", "000011", "000011", "000011",
        "000011",
    ]),
    builtin(&[
        "111111", "111111", "110000", "110000", "111111", "111111", "000011", "000011", "111111",
        "111111",
    ]),
    builtin(&[
        "111111", "111111", "110000", "110000", "111111", "111111", "110011", "110011", "111111",
        "111111",
    ]),
    builtin(&[
        "111111", "111111", "000011", "000110", "001100", "001100", "011000", "011000", "011000",
        "011000",
    ]),
    builtin(&[
        "111111", "110011", "110011", "110011", "111111", "111111", "110011", "110011", "110011",
        "111111",
    ]),
    builtin(&[
        "111111", "110011", "110011", "110011", "111111", "111111", "000011", "000011", "111111",
        "111111",
    ]),
]) {
    Ok(font) => font,
    Err(_) => panic!("digit glyphs differ in size"),
};

const MOOD_NAME_HAPPY: &str = "happy";
const MOOD_NAME_SAD: &str = "sad";
const MOOD_NAME_STRESSED: &str = "stressed";

/// Mood faces chosen from the scoreline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    /// Tracked team is ahead
    Happy,
    /// Tracked team is behind
    Sad,
    /// Tied game
    Stressed,
}

impl Mood {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => MOOD_NAME_HAPPY,
            Self::Sad => MOOD_NAME_SAD,
            Self::Stressed => MOOD_NAME_STRESSED,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MOOD_NAME_HAPPY => Some(Self::Happy),
            MOOD_NAME_SAD => Some(Self::Sad),
            MOOD_NAME_STRESSED => Some(Self::Stressed),
            _ => None,
        }
    }
}

const EMOJI_HAPPY: Glyph = builtin(&[
    "00000000000000",
    "00000000000000",
    "00111000011100",
    "00111000011100",
    "00111000011100",
    "00000000000000",
    "00000000000000",
    "01111111111110",
    "00111111111100",
    "00011111111000",
    "00000000000000",
    "00000000000000",
]);

const EMOJI_SAD: Glyph = builtin(&[
    "00000000000000",
    "00000000000000",
    "00111000011100",
    "00111000011100",
    "00111000011100",
    "00000000000000",
    "00000000000000",
    "00011111111000",
    "00111111111100",
    "01111111111110",
    "00000000000000",
    "00000000000000",
]);

const EMOJI_STRESSED: Glyph = builtin(&[
    "00000000000000",
    "00000000000000",
    "00111000011100",
    "00111000011100",
    "00111000011100",
    "00000000000000",
    "00000000000000",
    "10001000100010",
    "01010101010100",
    "00100010001000",
    "00000000000000",
    "00000000000000",
]);

/// Full-matrix face for a mood
pub const fn emoji_glyph(mood: Mood) -> &'static Glyph {
    match mood {
        Mood::Happy => &EMOJI_HAPPY,
        Mood::Sad => &EMOJI_SAD,
        Mood::Stressed => &EMOJI_STRESSED,
    }
}

/// Face glyph looked up by mood name
pub fn emoji_by_name(name: &str) -> Result<&'static Glyph> {
    Mood::parse_from_str(name)
        .map(emoji_glyph)
        .ok_or(Error::UnknownGlyph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_rows() {
        assert_eq!(
            Glyph::new(&["101", "10"]),
            Err(Error::MalformedGlyph { row: 1 })
        );
    }

    #[test]
    fn rejects_illegal_cells() {
        assert_eq!(
            Glyph::new(&["101", "1x1"]),
            Err(Error::MalformedGlyph { row: 1 })
        );
    }

    #[test]
    fn lit_cells_follow_rows() {
        let glyph = builtin(&["10", "01"]);
        let mut cells = glyph.lit_cells();
        assert_eq!(cells.next(), Some((0, 0)));
        assert_eq!(cells.next(), Some((1, 1)));
        assert_eq!(cells.next(), None);
    }

    #[test]
    fn digit_font_is_six_by_ten() {
        assert_eq!(DIGITS_6X10.width(), 6);
        assert_eq!(DIGITS_6X10.height(), 10);
        assert_eq!(DIGITS_6X10.digit(10), Err(Error::UnknownGlyph));
    }

    #[test]
    fn unknown_emoji_name() {
        assert_eq!(emoji_by_name("angry"), Err(Error::UnknownGlyph));
        assert!(emoji_by_name("sad").is_ok());
    }
}
