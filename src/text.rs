//! Rendering glyphs from the bitmap font as scaled filled squares.
//!
//! The rasterizer only ever draws set bits; unset bits are left as they were. To redraw a cell
//! whose previous contents may differ, such as the digits of a running clock, use
//! `clear_then_draw_char`, which paints the whole cell with the background first.

use crate::color::Rgb565;
use crate::display::{Display, PixelCoord, Window};
use crate::error::Error;
use crate::font::{glyph, Glyph, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::interface::DisplayInterface;

/// Something that can fill axis-aligned rectangles with a solid colour. This is the only
/// primitive the rasterizer needs.
pub trait FillTarget {
    /// Error type of the underlying bus.
    type BusError;

    /// Size of the drawable area in pixels.
    fn size(&self) -> PixelCoord;

    /// Fill the `w` by `h` rectangle whose upper left pixel is `(x, y)`. Empty or off-panel
    /// rectangles must be rejected with `Error::Geometry` without drawing anything.
    fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: Rgb565,
    ) -> Result<(), Error<Self::BusError>>;
}

impl<DI> FillTarget for Display<DI>
where
    DI: DisplayInterface,
{
    type BusError = DI::Error;

    fn size(&self) -> PixelCoord {
        Display::size(self)
    }

    fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: i16,
        h: i16,
        color: Rgb565,
    ) -> Result<(), Error<DI::Error>> {
        Display::fill_rect(self, x, y, w, h, color)
    }
}

/// The conventional distance between the origins of adjacent glyphs: the glyph width plus one
/// pixel of spacing, scaled.
pub fn glyph_advance(scale: u8) -> i16 {
    i16::from(GLYPH_WIDTH) * i16::from(scale) + 1
}

/// Text drawing on top of any `FillTarget`.
pub trait Rasterizer: FillTarget {
    /// Draw `c` with its upper left corner at `origin`, each font pixel becoming a `scale` by
    /// `scale` square. Characters missing from the font draw as a space.
    ///
    /// Every set pixel must land on the panel and `scale` must be at least 1; otherwise
    /// `Error::Geometry` is returned before anything is drawn, so a glyph is never left half
    /// drawn by a geometry error. Blank rows and columns of the cell may hang off the edge.
    fn draw_char(
        &mut self,
        origin: PixelCoord,
        c: char,
        color: Rgb565,
        scale: u8,
    ) -> Result<(), Error<Self::BusError>> {
        let bitmap = glyph(c);
        let scale = check_ink(self.size(), origin, bitmap, scale)?;
        for (col, row) in bitmap.set_pixels() {
            self.fill_rect(
                origin.0 + i16::from(col) * scale,
                origin.1 + i16::from(row) * scale,
                scale,
                scale,
                color,
            )?;
        }
        Ok(())
    }

    /// Draw `text` left to right starting at `origin`, moving the cursor `advance` pixels right
    /// after each character (see `glyph_advance`). There is no wrapping or clipping: drawing stops
    /// with `Error::Geometry` at the first character with a set pixel off the panel.
    fn draw_text(
        &mut self,
        origin: PixelCoord,
        text: &str,
        color: Rgb565,
        scale: u8,
        advance: i16,
    ) -> Result<(), Error<Self::BusError>> {
        let mut x = origin.0;
        for c in text.chars() {
            self.draw_char(PixelCoord(x, origin.1), c, color, scale)?;
            x = x.saturating_add(advance);
        }
        Ok(())
    }

    /// Paint the glyph cell at `origin` with `background`, then draw `c` over it in `color`. The
    /// part of the cell that is off the panel is skipped; `c` is checked as for `draw_char`
    /// before anything is painted.
    fn clear_then_draw_char(
        &mut self,
        origin: PixelCoord,
        c: char,
        color: Rgb565,
        background: Rgb565,
        scale: u8,
    ) -> Result<(), Error<Self::BusError>> {
        let size = self.size();
        let cell_scale = check_ink(size, origin, glyph(c), scale)?;
        if let Some((x, y, w, h)) = visible_cell(size, origin, cell_scale) {
            self.fill_rect(x, y, w, h, background)?;
        }
        self.draw_char(origin, c, color, scale)
    }
}

impl<T> Rasterizer for T where T: FillTarget + ?Sized {}

/// Check that `scale` is usable and every set pixel of `bitmap` drawn at `origin` lands on a panel
/// of `size`. Returns the scale widened for coordinate arithmetic.
fn check_ink<E>(
    size: PixelCoord,
    origin: PixelCoord,
    bitmap: Glyph,
    scale: u8,
) -> Result<i16, Error<E>> {
    if scale == 0 {
        return Err(Error::Geometry);
    }
    let scale = i16::from(scale);
    let (c0, r0, c1, r1) = match bitmap.ink_bounds() {
        Some(bounds) => bounds,
        None => return Ok(scale),
    };
    let x = origin.0.checked_add(i16::from(c0) * scale);
    let y = origin.1.checked_add(i16::from(r0) * scale);
    let w = i16::from(c1 - c0 + 1) * scale;
    let h = i16::from(r1 - r0 + 1) * scale;
    x.zip(y)
        .and_then(|(x, y)| Window::from_rect(x, y, w, h, size.0 as u16, size.1 as u16))
        .map(|_| scale)
        .ok_or(Error::Geometry)
}

/// The part of the glyph cell at `origin` that lies on a panel of `size`, as `(x, y, w, h)`.
fn visible_cell(size: PixelCoord, origin: PixelCoord, scale: i16) -> Option<(i16, i16, i16, i16)> {
    let (x, y) = (i32::from(origin.0), i32::from(origin.1));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i32::from(GLYPH_WIDTH) * i32::from(scale)).min(i32::from(size.0));
    let y1 = (y + i32::from(GLYPH_HEIGHT) * i32::from(scale)).min(i32::from(size.1));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    // Clipped to the panel, so everything fits back into i16.
    Some((x0 as i16, y0 as i16, (x1 - x0) as i16, (y1 - y0) as i16))
}
