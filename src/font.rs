//! The 5x8 bitmap font.
//!
//! Each glyph is five column bytes, left to right. Bit 0 of a column byte is the top row and bit 7
//! the bottom row; the bottom row is blank in every glyph so that lines of text do not touch. The
//! byte values are those of the common 5x7 character-LCD font, and are kept exactly so that text
//! renders identically on every device that shares the table.

use itertools::iproduct;

/// Columns per glyph.
pub const GLYPH_WIDTH: u8 = 5;
/// Rows per glyph.
pub const GLYPH_HEIGHT: u8 = 8;

/// A 5-column by 8-row monochrome bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph(pub [u8; GLYPH_WIDTH as usize]);

impl Glyph {
    pub const BLANK: Glyph = Glyph([0x00; GLYPH_WIDTH as usize]);

    /// Whether the pixel at `col` (0-4), `row` (0-7) is set. Out-of-range coordinates are unset.
    pub fn is_set(&self, col: u8, row: u8) -> bool {
        col < GLYPH_WIDTH && row < GLYPH_HEIGHT && self.0[col as usize] & (1 << row) != 0
    }

    /// The set pixels as `(col, row)` pairs, walking each column top to bottom, left to right.
    pub fn set_pixels(self) -> impl Iterator<Item = (u8, u8)> {
        iproduct!(0..GLYPH_WIDTH, 0..GLYPH_HEIGHT).filter(move |&(col, row)| self.is_set(col, row))
    }

    /// The inclusive bounding box `(col0, row0, col1, row1)` of the set pixels, or `None` for a
    /// blank glyph.
    pub fn ink_bounds(&self) -> Option<(u8, u8, u8, u8)> {
        self.set_pixels().fold(None, |bounds, (col, row)| match bounds {
            None => Some((col, row, col, row)),
            Some((c0, r0, c1, r1)) => Some((c0.min(col), r0.min(row), c1.max(col), r1.max(row))),
        })
    }

    /// The bitmap as eight row bytes, top to bottom, where bit 0 is the leftmost column.
    pub fn rows(&self) -> [u8; GLYPH_HEIGHT as usize] {
        let mut rows = [0u8; GLYPH_HEIGHT as usize];
        for (col, row) in self.set_pixels() {
            rows[row as usize] |= 1 << col;
        }
        rows
    }
}

#[rustfmt::skip]
static GLYPHS: [(char, Glyph); 40] = [
    (' ', Glyph([0x00, 0x00, 0x00, 0x00, 0x00])),
    ('-', Glyph([0x00, 0x08, 0x08, 0x08, 0x00])),
    ('.', Glyph([0x00, 0x60, 0x60, 0x00, 0x00])),
    ('0', Glyph([0x3E, 0x51, 0x49, 0x45, 0x3E])),
    ('1', Glyph([0x00, 0x42, 0x7F, 0x40, 0x00])),
    ('2', Glyph([0x42, 0x61, 0x51, 0x49, 0x46])),
    ('3', Glyph([0x21, 0x41, 0x45, 0x4B, 0x31])),
    ('4', Glyph([0x18, 0x14, 0x12, 0x7F, 0x10])),
    ('5', Glyph([0x27, 0x45, 0x45, 0x45, 0x39])),
    ('6', Glyph([0x3C, 0x4A, 0x49, 0x49, 0x30])),
    ('7', Glyph([0x01, 0x71, 0x09, 0x05, 0x03])),
    ('8', Glyph([0x36, 0x49, 0x49, 0x49, 0x36])),
    ('9', Glyph([0x06, 0x49, 0x49, 0x29, 0x1E])),
    (':', Glyph([0x00, 0x36, 0x36, 0x00, 0x00])),
    ('A', Glyph([0x7C, 0x12, 0x11, 0x12, 0x7C])),
    ('B', Glyph([0x7F, 0x49, 0x49, 0x49, 0x36])),
    ('C', Glyph([0x3E, 0x41, 0x41, 0x41, 0x22])),
    ('D', Glyph([0x7F, 0x41, 0x41, 0x22, 0x1C])),
    ('E', Glyph([0x7F, 0x49, 0x49, 0x49, 0x41])),
    ('F', Glyph([0x7F, 0x09, 0x09, 0x09, 0x01])),
    ('G', Glyph([0x3E, 0x41, 0x49, 0x49, 0x3A])),
    ('H', Glyph([0x7F, 0x08, 0x08, 0x08, 0x7F])),
    ('I', Glyph([0x00, 0x41, 0x7F, 0x41, 0x00])),
    ('J', Glyph([0x20, 0x40, 0x41, 0x3F, 0x01])),
    ('K', Glyph([0x7F, 0x08, 0x14, 0x22, 0x41])),
    ('L', Glyph([0x7F, 0x40, 0x40, 0x40, 0x40])),
    ('M', Glyph([0x7F, 0x02, 0x0C, 0x02, 0x7F])),
    ('N', Glyph([0x7F, 0x04, 0x08, 0x10, 0x7F])),
    ('O', Glyph([0x3E, 0x41, 0x41, 0x41, 0x3E])),
    ('P', Glyph([0x7F, 0x09, 0x09, 0x09, 0x06])),
    ('Q', Glyph([0x3E, 0x41, 0x51, 0x21, 0x5E])),
    ('R', Glyph([0x7F, 0x09, 0x19, 0x29, 0x46])),
    ('S', Glyph([0x26, 0x49, 0x49, 0x49, 0x32])),
    ('T', Glyph([0x01, 0x01, 0x7F, 0x01, 0x01])),
    ('U', Glyph([0x3F, 0x40, 0x40, 0x40, 0x3F])),
    ('V', Glyph([0x1F, 0x20, 0x40, 0x20, 0x1F])),
    ('W', Glyph([0x7F, 0x20, 0x18, 0x20, 0x7F])),
    ('X', Glyph([0x63, 0x14, 0x08, 0x14, 0x63])),
    ('Y', Glyph([0x03, 0x04, 0x78, 0x04, 0x03])),
    ('Z', Glyph([0x61, 0x51, 0x49, 0x45, 0x43])),
];

/// Look up the glyph for `c`. Characters without a glyph get the blank (space) glyph, so arbitrary
/// status text can always be rendered.
pub fn glyph(c: char) -> Glyph {
    lookup(c).unwrap_or(Glyph::BLANK)
}

/// Look up the glyph for `c`, if the table has one.
pub fn lookup(c: char) -> Option<Glyph> {
    GLYPHS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|&(_, glyph)| glyph)
}
