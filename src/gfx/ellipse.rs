use super::tables::{degrees, sin_cos_1024, sin_cos_256, SQRT_LUT};
use super::{Canvas, Coverage};

/// Visit the first-quadrant points `(dx, dy)` of an ellipse with radii
/// `a` and `b`, from `(0, b)` round to `(a, 0)`.
fn quadrant(a: i32, b: i32, mut visit: impl FnMut(i32, i32)) {
    let (a, b) = (a as i64, b as i64);
    let (a2, b2) = (a * a, b * b);
    let (mut dx, mut dy) = (0i64, b);
    let mut err = b2 - (2 * dy - 1) * a2;
    loop {
        visit(dx as i32, dy as i32);
        let e2 = 2 * err;
        if e2 < (2 * dx + 1) * b2 {
            dx += 1;
            err += (2 * dx + 1) * b2;
        }
        if e2 > -(2 * dy - 1) * a2 {
            dy -= 1;
            err -= (2 * dy - 1) * a2;
        }
        if dy < 0 {
            break;
        }
    }
    // Flat ellipses leave the tips of the major axis unvisited.
    while dx < a {
        dx += 1;
        visit(dx as i32, 0);
    }
}

impl Canvas<'_> {
    /// Outline of the ellipse inscribed in `w × h`, centred on `(x0, y0)`.
    ///
    /// `thickness` draws that many concentric outlines, each one pixel
    /// smaller. A width or height of 1 draws a straight line instead.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse(
        &self,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        c: u8,
        thickness: i32,
        transparency: i32,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let thickness = thickness.max(1);

        if w == 1 || h == 1 {
            let lead = thickness / 2;
            if w == 1 {
                let top = y0.saturating_sub(h / 2);
                for row in top.max(0)..top.saturating_add(h).min(self.height()) {
                    for col in 0..thickness {
                        self.put_row_dithered(x0 - lead + col, row, code, coverage);
                    }
                }
            } else {
                for row in y0 - lead..y0 - lead + thickness {
                    if coverage.row(row) {
                        self.span(x0.saturating_sub(w / 2), row, w, code);
                    }
                }
            }
            return;
        }

        for t in 0..thickness {
            let (a, b) = (w / 2 - t, h / 2 - t);
            if a < 1 || b < 1 {
                break;
            }
            quadrant(a, b, |dx, dy| {
                self.put_row_dithered(x0 + dx, y0 + dy, code, coverage);
                self.put_row_dithered(x0 - dx, y0 + dy, code, coverage);
                self.put_row_dithered(x0 - dx, y0 - dy, code, coverage);
                self.put_row_dithered(x0 + dx, y0 - dy, code, coverage);
            });
        }
    }

    /// [`draw_ellipse`](Self::draw_ellipse) rotated by `angle` degrees.
    /// Outline points are rotated forwards and dithered at their final row.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_ellipse_rotated(
        &self,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        c: u8,
        thickness: i32,
        transparency: i32,
        angle: i32,
    ) {
        match degrees(angle) {
            0 | 180 => return self.draw_ellipse(x0, y0, w, h, c, thickness, transparency),
            90 | 270 => return self.draw_ellipse(x0, y0, h, w, c, thickness, transparency),
            _ => {}
        }
        if w <= 0 || h <= 0 {
            return;
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let thickness = thickness.max(1);
        let (sin, cos) = sin_cos_1024(angle);
        let plot = |dx: i32, dy: i32| {
            let px = x0 + ((dx * cos - dy * sin) >> 10);
            let py = y0 + ((dx * sin + dy * cos) >> 10);
            self.put_row_dithered(px, py, code, coverage);
        };

        if w == 1 || h == 1 {
            let lead = thickness / 2;
            for off in -lead..thickness - lead {
                if w == 1 {
                    (-h / 2..h - h / 2).for_each(|d| plot(off, d));
                } else {
                    (-w / 2..w - w / 2).for_each(|d| plot(d, off));
                }
            }
            return;
        }

        for t in 0..thickness {
            let (a, b) = (w / 2 - t, h / 2 - t);
            if a < 1 || b < 1 {
                break;
            }
            quadrant(a, b, |dx, dy| {
                plot(dx, dy);
                plot(-dx, dy);
                plot(-dx, -dy);
                plot(dx, -dy);
            });
        }
    }

    /// Filled ellipse inscribed in `w × h`, one span per row.
    pub fn fill_ellipse(&self, x0: i32, y0: i32, w: i32, h: i32, c: u8, transparency: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let (a, b) = ((w / 2) as i64, (h / 2) as i64);
        let top = (y0 as i64 - b).max(0);
        let bottom = (y0 as i64 + b).min(self.height() as i64 - 1);

        for row in top..=bottom {
            let row = row as i32;
            if !coverage.row(row) {
                continue;
            }
            let dy = row as i64 - y0 as i64;
            // Half-width from x = a * sqrt(1 - dy²/b²), via the table.
            let norm = if b == 0 { 0 } else { ((dy * dy * 255) / (b * b)).clamp(0, 255) };
            let dx = (a * SQRT_LUT[(255 - norm) as usize] as i64 / 255) as i32;
            self.span(x0.saturating_sub(dx), row, 2 * dx + 1, code);
        }
    }

    /// Filled ellipse rotated by `angle` degrees: every pixel of the rotated
    /// bounding box is mapped back into ellipse space and tested against
    /// the implicit equation, and runs of inside pixels become spans.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_ellipse_rotated(
        &self,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        c: u8,
        transparency: i32,
        angle: i32,
    ) {
        match degrees(angle) {
            0 | 180 => return self.fill_ellipse(x0, y0, w, h, c, transparency),
            90 | 270 => return self.fill_ellipse(x0, y0, h, w, c, transparency),
            _ => {}
        }
        if w <= 0 || h <= 0 {
            return;
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let (a, b) = (w / 2, h / 2);
        let (sin, cos) = sin_cos_256(angle);
        let bound_w = ((a * cos.abs() + b * sin.abs()) >> 8) + 1;
        let bound_h = ((a * sin.abs() + b * cos.abs()) >> 8) + 1;
        let (a2, b2) = (a as i64 * a as i64, b as i64 * b as i64);

        for dy in -bound_h..=bound_h {
            let row = y0 + dy;
            if row < 0 || row >= self.height() || !coverage.row(row) {
                continue;
            }
            self.fill_spans_where(row, x0 - bound_w, x0 + bound_w, code, |px| {
                let dx = px - x0;
                let ex = ((dx * cos + dy * sin) >> 8) as i64;
                let ey = ((dy * cos - dx * sin) >> 8) as i64;
                ex * ex * b2 + ey * ey * a2 <= a2 * b2
            });
        }
    }

    /// Filled circle of radius `r`.
    pub fn fill_circle(&self, x0: i32, y0: i32, r: i32, c: u8) {
        if r < 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        self.column(x0, y0 - r, 2 * r + 1, code);
        self.fill_circle_corners(x0, y0, r, 0x3, 0, code);
    }

    /// Quarter-circle arcs of radius `r` around `(x0, y0)`.
    /// `corners`: 0x1 top-left, 0x2 top-right, 0x4 bottom-right, 0x8 bottom-left.
    pub(crate) fn circle_corners(&self, x0: i32, y0: i32, r: i32, corners: u8, code: u8) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let (mut x, mut y) = (0, r);
        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            if corners & 0x4 != 0 {
                self.put(x0 + x, y0 + y, code);
                self.put(x0 + y, y0 + x, code);
            }
            if corners & 0x2 != 0 {
                self.put(x0 + x, y0 - y, code);
                self.put(x0 + y, y0 - x, code);
            }
            if corners & 0x8 != 0 {
                self.put(x0 - y, y0 + x, code);
                self.put(x0 - x, y0 + y, code);
            }
            if corners & 0x1 != 0 {
                self.put(x0 - y, y0 - x, code);
                self.put(x0 - x, y0 - y, code);
            }
        }
    }

    /// Filled half-discs as vertical runs: 0x1 right half, 0x2 left half.
    /// `delta` stretches each run downwards, for rounded rectangles.
    pub(crate) fn fill_circle_corners(
        &self,
        x0: i32,
        y0: i32,
        r: i32,
        corners: u8,
        delta: i32,
        code: u8,
    ) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let (mut x, mut y) = (0, r);
        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            if corners & 0x1 != 0 {
                self.column(x0.saturating_add(x), y0.saturating_sub(y), 2 * y + 1 + delta, code);
                self.column(x0.saturating_add(y), y0.saturating_sub(x), 2 * x + 1 + delta, code);
            }
            if corners & 0x2 != 0 {
                self.column(x0.saturating_sub(x), y0.saturating_sub(y), 2 * y + 1 + delta, code);
                self.column(x0.saturating_sub(y), y0.saturating_sub(x), 2 * x + 1 + delta, code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::quadrant;
    use crate::gfx::tests::{lit, video};

    #[test]
    fn test_quadrant_reaches_both_axes() {
        let mut points = Vec::new();
        quadrant(10, 4, |x, y| points.push((x, y)));
        assert_eq!(points.first(), Some(&(0, 4)));
        assert!(points.contains(&(10, 0)));
        assert!(points.iter().all(|&(x, y)| x >= 0 && y >= 0 && x <= 10 && y <= 4));
    }

    #[test]
    fn test_circle_outline_is_symmetric() {
        let mut v = video();
        v.canvas().draw_ellipse(100, 100, 20, 20, 1, 1, 255);
        let points = lit(&v);
        for p in [(100, 90), (100, 110), (90, 100), (110, 100)] {
            assert!(points.contains(&p), "missing {p:?}");
        }
        for &(x, y) in &points {
            assert!(points.contains(&(200 - x, y)));
            assert!(points.contains(&(x, 200 - y)));
        }
        assert!(!points.contains(&(100, 100)));
    }

    #[test]
    fn test_thick_ellipse_nests_outlines() {
        let mut v = video();
        v.canvas().draw_ellipse(100, 100, 20, 20, 1, 3, 255);
        let points = lit(&v);
        for y in [90, 91, 92] {
            assert!(points.contains(&(100, y)));
        }
        assert!(!points.contains(&(100, 93)));
    }

    #[test]
    fn test_degenerate_ellipse_is_a_line() {
        let mut v = video();
        v.canvas().draw_ellipse(50, 50, 1, 9, 1, 1, 255);
        assert_eq!(lit(&v), (46..55).map(|y| (50, y)).collect::<Vec<_>>());

        let mut v = video();
        v.canvas().draw_ellipse(50, 50, 9, 1, 1, 1, 255);
        assert_eq!(lit(&v), (46..55).map(|x| (x, 50)).collect::<Vec<_>>());
    }

    #[test]
    fn test_rotated_ellipse_fast_paths() {
        let mut a = video();
        a.canvas().draw_ellipse_rotated(80, 80, 30, 10, 1, 1, 255, 90);
        let mut b = video();
        b.canvas().draw_ellipse(80, 80, 10, 30, 1, 1, 255);
        assert_eq!(lit(&a), lit(&b));
    }

    #[test]
    fn test_rotated_ellipse_follows_major_axis() {
        let mut v = video();
        v.canvas().draw_ellipse_rotated(128, 120, 60, 10, 1, 1, 255, 45);
        let points = lit(&v);
        // The tips of the major axis land on the 45 degree diagonal.
        assert!(points.iter().any(|&(x, y)| x >= 148 && y >= 140));
        assert!(points.iter().any(|&(x, y)| x <= 108 && y <= 100));
        assert!(!points.iter().any(|&(x, y)| x >= 148 && y <= 100));
    }

    #[test]
    fn test_fill_ellipse_spans() {
        let mut v = video();
        v.canvas().fill_ellipse(100, 100, 20, 10, 1, 255);
        let points = lit(&v);
        let centre_row = points.iter().filter(|p| p.1 == 100).count();
        assert_eq!(centre_row, 21);
        assert!(points.iter().all(|&(_, y)| (95..=105).contains(&y)));
        let top_row = points.iter().filter(|p| p.1 == 95).count();
        assert_eq!(top_row, 1);
    }

    #[test]
    fn test_tall_fill_ellipse_clips_to_screen() {
        let mut v = video();
        v.canvas().fill_ellipse(128, 120, 40, 6000, 1, 255);
        let points = lit(&v);
        // Near the centre of a very tall ellipse every row is full width.
        assert_eq!(points.len(), 240 * 41);
        assert!(points.iter().all(|&(x, _)| (108..=148).contains(&x)));

        let mut v = video();
        v.canvas().fill_ellipse(0, 0, i32::MAX, i32::MAX, 1, 255);
        assert_eq!(lit(&v).len(), 256 * 240);
    }

    #[test]
    fn test_tall_degenerate_ellipse_clips_to_screen() {
        let mut v = video();
        v.canvas().draw_ellipse(50, 50, 1, i32::MAX, 1, 1, 255);
        assert_eq!(lit(&v), (0..240).map(|y| (50, y)).collect::<Vec<_>>());
    }

    #[test]
    fn test_rotated_fill_matches_area() {
        let mut v = video();
        v.canvas().fill_ellipse_rotated(128, 120, 40, 20, 1, 255, 30);
        let n = lit(&v).len() as f64;
        let area = std::f64::consts::PI * 20.0 * 10.0;
        assert!((n - area).abs() < area * 0.15, "{n} vs {area}");
    }

    #[test]
    fn test_transparent_fill_draws_less() {
        let mut full = video();
        full.canvas().fill_ellipse_rotated(128, 120, 40, 20, 1, 255, 30);
        let mut half = video();
        half.canvas().fill_ellipse_rotated(128, 120, 40, 20, 1, 128, 30);
        let mut none = video();
        none.canvas().fill_ellipse_rotated(128, 120, 40, 20, 1, 0, 30);
        let (f, h) = (lit(&full), lit(&half));
        assert!(h.len() < f.len());
        assert!(h.iter().all(|p| f.contains(p)));
        assert!(lit(&none).is_empty());
    }

    #[test]
    fn test_fill_circle() {
        let mut v = video();
        v.canvas().fill_circle(50, 50, 5, 1);
        let points = lit(&v);
        assert!(points.contains(&(50, 45)));
        assert!(points.contains(&(45, 50)));
        assert!(points.contains(&(55, 50)));
        assert!(points.contains(&(50, 50)));
        assert!(!points.contains(&(45, 45)));
        for &(x, y) in &points {
            assert!(points.contains(&(100 - x, y)));
        }
    }
}
