//! Frame buffer for the LED matrix
//!
//! All drawing happens in a local logical W x H grid. The sink is touched only
//! by [`Compositor::flush`], which maps every cell through the matrix geometry
//! and then latches the strip.

use crate::PixelSink;
use crate::color::{BLACK, Rgb};
use crate::error::{Error, Result};
use crate::geometry::MatrixGeometry;
use crate::glyph::{DIGITS_6X10, DigitFont, Glyph};

/// Where a 0-99 number lands on the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLayout {
    /// Left column of the first digit when centered
    pub x: i32,
    /// Top row of the digits when centered
    pub y: i32,
    /// Digits to draw, tens first; `None` for one-digit numbers
    pub digits: (u8, Option<u8>),
    /// Total width including the gap
    pub width: usize,
    pub height: usize,
}

/// Logical frame buffer with glyph drawing
///
/// `MAX_PIXELS` bounds the buffer; the active area is set by the geometry.
pub struct Compositor<const MAX_PIXELS: usize> {
    geometry: MatrixGeometry,
    font: &'static DigitFont,
    frame: [Rgb; MAX_PIXELS],
}

impl<const MAX_PIXELS: usize> Compositor<MAX_PIXELS> {
    /// Create a compositor using the built-in 6x10 digits
    pub fn new(geometry: MatrixGeometry) -> Result<Self> {
        Self::with_font(geometry, &DIGITS_6X10)
    }

    /// Create a compositor with a custom digit font
    pub fn with_font(geometry: MatrixGeometry, font: &'static DigitFont) -> Result<Self> {
        let needed = geometry.pixel_count();
        if needed > MAX_PIXELS {
            return Err(Error::BufferTooSmall {
                capacity: MAX_PIXELS,
                needed,
            });
        }
        Ok(Self {
            geometry,
            font,
            frame: [BLACK; MAX_PIXELS],
        })
    }

    pub const fn geometry(&self) -> &MatrixGeometry {
        &self.geometry
    }

    /// Color currently stored at (x, y), if on the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        self.frame.get(y * self.geometry.width + x).copied()
    }

    /// Set every logical cell to `color`
    pub fn fill(&mut self, color: Rgb) {
        let count = self.geometry.pixel_count();
        for cell in &mut self.frame[..count] {
            *cell = color;
        }
    }

    /// Set one cell; off-grid coordinates are ignored
    #[allow(clippy::cast_sign_loss)]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if !self.geometry.contains(x, y) {
            return;
        }
        let index = y as usize * self.geometry.width + x as usize;
        self.frame[index] = color;
    }

    /// Paint every lit glyph cell at `origin + cell` with `foreground`
    ///
    /// Unlit cells keep whatever the frame already holds. Cells that land off
    /// the grid are clipped; a glyph larger than the matrix is rejected before
    /// anything is drawn.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn draw_glyph(
        &mut self,
        glyph: &Glyph,
        origin_x: i32,
        origin_y: i32,
        foreground: Rgb,
    ) -> Result<()> {
        if glyph.width() > self.geometry.width || glyph.height() > self.geometry.height {
            return Err(Error::GlyphTooLarge {
                width: glyph.width(),
                height: glyph.height(),
                matrix_width: self.geometry.width,
                matrix_height: self.geometry.height,
            });
        }

        for (x, y) in glyph.lit_cells() {
            self.set_pixel(origin_x + x as i32, origin_y + y as i32, foreground);
        }
        Ok(())
    }

    /// Draw a glyph centered on the matrix
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn draw_glyph_centered(&mut self, glyph: &Glyph, foreground: Rgb) -> Result<()> {
        let x = self.geometry.width.saturating_sub(glyph.width()) / 2;
        let y = self.geometry.height.saturating_sub(glyph.height()) / 2;
        self.draw_glyph(glyph, x as i32, y as i32, foreground)
    }

    /// Work out the centered placement of `n` with `gap` columns between digits
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn number_layout(&self, n: i32, gap: usize) -> Result<NumberLayout> {
        if !(0..=99).contains(&n) {
            return Err(Error::InvalidNumber(n));
        }
        let n = n as u8;
        let digits = if n < 10 { (n, None) } else { (n / 10, Some(n % 10)) };

        let digit_width = self.font.width();
        let width = match digits.1 {
            Some(_) => digit_width * 2 + gap,
            None => digit_width,
        };
        let height = self.font.height();

        if width > self.geometry.width || height > self.geometry.height {
            return Err(Error::LayoutOverflow {
                width,
                height,
                matrix_width: self.geometry.width,
                matrix_height: self.geometry.height,
            });
        }

        Ok(NumberLayout {
            x: ((self.geometry.width - width) / 2) as i32,
            y: ((self.geometry.height - height) / 2) as i32,
            digits,
            width,
            height,
        })
    }

    /// Draw the digits of `layout` with their top-left corner at (x, y)
    ///
    /// Used by animations that nudge the number around; cells pushed off the
    /// grid are clipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn draw_number_at(
        &mut self,
        layout: &NumberLayout,
        x: i32,
        y: i32,
        foreground: Rgb,
        gap: usize,
    ) -> Result<()> {
        let font = self.font;
        let (first, second) = layout.digits;
        self.draw_glyph(font.digit(first)?, x, y, foreground)?;
        if let Some(second) = second {
            let offset = (font.width() + gap) as i32;
            self.draw_glyph(font.digit(second)?, x + offset, y, foreground)?;
        }
        Ok(())
    }

    /// Fill with `background` and draw `n` (0-99) centered in `foreground`
    pub fn draw_number(&mut self, n: i32, foreground: Rgb, background: Rgb, gap: usize) -> Result<()> {
        let layout = self.number_layout(n, gap)?;
        self.fill(background);
        self.draw_number_at(&layout, layout.x, layout.y, foreground, gap)
    }

    /// Write every logical cell to its physical index, then latch the sink
    pub fn flush<S: PixelSink>(&self, sink: &mut S) {
        let width = self.geometry.width;
        for y in 0..self.geometry.height {
            for x in 0..width {
                sink.set_pixel(self.geometry.index(x, y), self.frame[y * width + x]);
            }
        }
        sink.show();
    }
}
