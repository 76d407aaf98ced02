use super::Canvas;

impl Canvas<'_> {
    /// Visit every point of the Bresenham line from `(x0, y0)` to `(x1, y1)`,
    /// endpoints included.
    pub(crate) fn bresenham(
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
        mut plot: impl FnMut(i32, i32),
    ) {
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;
        for x in x0..=x1 {
            if steep {
                plot(y, x);
            } else {
                plot(x, y);
            }
            err -= dy;
            if err < 0 {
                y += ystep;
                err += dx;
            }
        }
    }

    pub fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32, c: u8) {
        let Some(code) = self.encode(c) else { return };
        Self::bresenham(x0, y0, x1, y1, |x, y| self.put(x, y, code));
    }

    /// Line drawn with a `thickness × thickness` square stamped at each step.
    pub fn draw_line_thick(&self, x0: i32, y0: i32, x1: i32, y1: i32, c: u8, thickness: i32) {
        if thickness <= 1 {
            self.draw_line(x0, y0, x1, y1, c);
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let lead = thickness / 2;
        Self::bresenham(x0, y0, x1, y1, |x, y| {
            for row in 0..thickness {
                self.span(x - lead, y - lead + row, thickness, code);
            }
        });
    }
}
