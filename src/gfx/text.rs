use std::fmt;

use super::font::{glyph, CELL, FIRST_CHAR};
use super::{Canvas, Coverage, OPAQUE};

/// Horizontal advance of a tab, in pixels.
pub const TAB_WIDTH: i32 = 4;

/// Position and style used by [`Canvas::write`].
///
/// Setting the background equal to the foreground makes text transparent:
/// only the glyph's set pixels are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCursor {
    x: i32,
    y: i32,
    size: i32,
    fg: u8,
    bg: u8,
    wrap: bool,
}

impl TextCursor {
    /// Cursor at the origin writing transparent text in colour `fg`.
    pub fn new(fg: u8) -> Self {
        Self {
            x: 0,
            y: 0,
            size: 1,
            fg,
            bg: fg,
            wrap: true,
        }
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Glyph scale factor, at least 1.
    pub fn set_size(&mut self, size: i32) {
        self.size = size.max(1);
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Transparent text in colour `c`.
    pub fn set_color(&mut self, c: u8) {
        self.fg = c;
        self.bg = c;
    }

    pub fn set_colors(&mut self, fg: u8, bg: u8) {
        self.fg = fg;
        self.bg = bg;
    }

    pub fn colors(&self) -> (u8, u8) {
        (self.fg, self.bg)
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    fn newline(&mut self) {
        self.y += CELL * self.size;
        self.x = 0;
    }
}

impl Canvas<'_> {
    /// Unscaled 8×8 cell with opaque background. Characters outside
    /// printable ASCII are skipped.
    pub fn print_char(&self, x: i32, y: i32, ch: u8, fg: u8, bg: u8) {
        if ch < FIRST_CHAR || ch >= 0x80 {
            return;
        }
        let (Some(fg), Some(bg)) = (self.encode(fg), self.encode(bg)) else {
            return;
        };
        for (row, &bits) in glyph(ch).iter().enumerate() {
            for col in 0..CELL {
                let code = if bits & (0x80 >> col) != 0 { fg } else { bg };
                self.put(x + col, y + row as i32, code);
            }
        }
    }

    /// [`print_char`](Self::print_char) for each byte of `s`, 8 pixels apart.
    pub fn print_string(&self, x: i32, y: i32, s: &str, fg: u8, bg: u8) {
        for (i, ch) in s.bytes().enumerate() {
            self.print_char(x + i as i32 * CELL, y, ch, fg, bg);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_char(&self, x: i32, y: i32, ch: u8, fg: u8, bg: u8, size: i32, transparency: i32) {
        self.draw_char_scaled(x, y, ch, fg, bg, size, size, transparency);
    }

    /// Glyph with its top-left corner at `(x, y)`, every font pixel
    /// replicated into a `w_size × h_size` block. Background pixels are
    /// skipped when `fg == bg`; rows are dropped by the row dither.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_char_scaled(
        &self,
        x: i32,
        y: i32,
        ch: u8,
        fg: u8,
        bg: u8,
        w_size: i32,
        h_size: i32,
        transparency: i32,
    ) {
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(fg_code) = self.encode(fg) else { return };
        let bg_code = if fg == bg {
            None
        } else {
            match self.encode(bg) {
                Some(code) => Some(code),
                None => return,
            }
        };
        let (w_size, h_size) = (w_size.max(1), h_size.max(1));

        for (row, &bits) in glyph(ch).iter().enumerate() {
            let top = y + row as i32 * h_size;
            for screen_y in top..top + h_size {
                if !coverage.row(screen_y) {
                    continue;
                }
                for col in 0..CELL {
                    let code = if bits & (0x80 >> col) != 0 {
                        fg_code
                    } else if let Some(bg_code) = bg_code {
                        bg_code
                    } else {
                        continue;
                    };
                    self.span(x + col * w_size, screen_y, w_size, code);
                }
            }
        }
    }

    /// Draw `ch` at the cursor and advance it, wrapping at the right edge
    /// when enabled. `\n` starts a new line, `\r` is ignored and `\t`
    /// moves right unless that would leave the screen.
    pub fn write(&mut self, ch: char) {
        let width = self.width();
        let cursor = self.cursor();
        match ch {
            '\n' => cursor.newline(),
            '\r' => {}
            '\t' => {
                if cursor.x + TAB_WIDTH < width {
                    cursor.x += TAB_WIDTH;
                }
            }
            _ => {
                let byte = u8::try_from(ch).unwrap_or(0);
                let TextCursor { x, y, size, fg, bg, .. } = *cursor;
                self.draw_char(x, y, byte, fg, bg, size, OPAQUE);

                let cursor = self.cursor();
                cursor.x += CELL * cursor.size;
                if cursor.wrap && cursor.x > width - CELL * cursor.size {
                    cursor.newline();
                }
            }
        }
    }

    pub fn write_str(&mut self, s: &str) {
        s.chars().for_each(|ch| self.write(ch));
    }
}

impl fmt::Write for Canvas<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Canvas::write_str(self, s);
        Ok(())
    }
}
