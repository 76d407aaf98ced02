//! Software rasterizer drawing into the back buffer.
//!
//! Every primitive clips silently to the framebuffer. Colours are palette
//! indices; an index above the palette maximum makes the call a no-op.
//! "Transparency" is ordered dithering: a value in `1..=255` decides which
//! pixels of a Bayer pattern are drawn, it never blends colours.

pub mod ellipse;
pub mod font;
pub mod image;
pub mod line;
pub mod rect;
pub mod shapes;
pub mod tables;
pub mod text;

use std::sync::RwLockReadGuard;

use crate::video::framebuffer::Framebuffer;
use crate::video::palette::Palette;
use crate::video::Screen;
use tables::{BAYER, BAYER_ROW};
use text::TextCursor;

/// Transparency value that draws every pixel.
pub const OPAQUE: i32 = 255;

/// Which pixels of a primitive survive ordered dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Draw nothing.
    Clear,
    /// Draw everything without consulting the matrix.
    Opaque,
    /// Draw where the Bayer threshold is at most this value (`0..=63`).
    Dithered(u8),
}

impl Coverage {
    /// Map a transparency in `0..=255` (values outside are clamped).
    pub fn from_transparency(transparency: i32) -> Self {
        if transparency <= 0 {
            Coverage::Clear
        } else if transparency >= OPAQUE {
            Coverage::Opaque
        } else {
            Coverage::Dithered(((transparency * 64) >> 8) as u8)
        }
    }

    pub fn is_clear(self) -> bool {
        self == Coverage::Clear
    }

    /// Per-pixel test against the full 8×8 matrix.
    #[inline]
    pub fn pixel(self, x: i32, y: i32) -> bool {
        match self {
            Coverage::Clear => false,
            Coverage::Opaque => true,
            Coverage::Dithered(t) => t >= BAYER[(y & 7) as usize][(x & 7) as usize],
        }
    }

    /// Whole-row test against the row projection, for span primitives.
    #[inline]
    pub fn row(self, y: i32) -> bool {
        match self {
            Coverage::Clear => false,
            Coverage::Opaque => true,
            Coverage::Dithered(t) => t >= BAYER_ROW[(y & 7) as usize],
        }
    }
}

/// Drawing surface over the back buffer of a [`Video`](crate::video::Video).
///
/// Holds the buffers for reading, so the front/back pair cannot be
/// reallocated while drawing is in progress.
pub struct Canvas<'a> {
    screen: RwLockReadGuard<'a, Screen>,
    back: usize,
    palette: Palette,
    cursor: &'a mut TextCursor,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(
        screen: RwLockReadGuard<'a, Screen>,
        back: usize,
        palette: Palette,
        cursor: &'a mut TextCursor,
    ) -> Self {
        Self { screen, back, palette, cursor }
    }

    #[inline]
    fn fb(&self) -> &Framebuffer {
        self.screen.buffer(self.back)
    }

    pub fn width(&self) -> i32 {
        self.fb().width() as i32
    }

    pub fn height(&self) -> i32 {
        self.fb().height() as i32
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn cursor(&mut self) -> &mut TextCursor {
        &mut *self.cursor
    }

    /// Stored byte for colour `c`, `None` if `c` is out of range.
    #[inline]
    pub(crate) fn encode(&self, c: u8) -> Option<u8> {
        self.palette.encode(c)
    }

    #[inline]
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    /// Store an already encoded byte, if on screen.
    #[inline]
    pub(crate) fn put(&self, x: i32, y: i32, code: u8) {
        if self.contains(x, y) {
            self.fb().set(x as usize, y as usize, code);
        }
    }

    /// [`put`](Self::put) gated by the per-pixel dither test.
    #[inline]
    pub(crate) fn put_dithered(&self, x: i32, y: i32, code: u8, coverage: Coverage) {
        if coverage.pixel(x, y) {
            self.put(x, y, code);
        }
    }

    /// [`put`](Self::put) gated by the row dither test.
    #[inline]
    pub(crate) fn put_row_dithered(&self, x: i32, y: i32, code: u8, coverage: Coverage) {
        if coverage.row(y) {
            self.put(x, y, code);
        }
    }

    /// Clipped horizontal run of an encoded byte.
    pub(crate) fn span(&self, x: i32, y: i32, w: i32, code: u8) {
        if y < 0 || y >= self.height() || w <= 0 {
            return;
        }
        let x0 = x.max(0);
        let x1 = x.saturating_add(w).min(self.width());
        if x1 > x0 {
            self.fb()
                .fill_span(x0 as usize, y as usize, (x1 - x0) as usize, code);
        }
    }

    /// Clipped vertical run of an encoded byte.
    pub(crate) fn column(&self, x: i32, y: i32, h: i32, code: u8) {
        if x < 0 || x >= self.width() || h <= 0 {
            return;
        }
        let y0 = y.max(0);
        let y1 = y.saturating_add(h).min(self.height());
        for yy in y0..y1 {
            self.fb().set(x as usize, yy as usize, code);
        }
    }

    pub fn draw_pixel(&self, x: i32, y: i32, c: u8) {
        if let Some(code) = self.encode(c) {
            self.put(x, y, code);
        }
    }

    /// Stored byte at `(x, y)` (`colour_base + c`), or `None` off screen.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.contains(x, y)
            .then(|| self.fb().get(x as usize, y as usize))
    }

    pub fn draw_hline(&self, x: i32, y: i32, w: i32, c: u8) {
        if let Some(code) = self.encode(c) {
            self.span(x, y, w, code);
        }
    }

    pub fn draw_vline(&self, x: i32, y: i32, h: i32, c: u8) {
        if let Some(code) = self.encode(c) {
            self.column(x, y, h, code);
        }
    }

    /// Fill the whole back buffer with colour `c`.
    pub fn clear(&self, c: u8) {
        if let Some(code) = self.encode(c) {
            self.fb().fill(code);
        }
    }
}
