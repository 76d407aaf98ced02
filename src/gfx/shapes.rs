use super::{Canvas, Coverage};

/// Unit offsets of the four star tips: right, down, left, up.
const STAR_TIPS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

impl Canvas<'_> {
    /// Four-pointed star inscribed in `w × h`, centred on `(x0, y0)`.
    ///
    /// Each tip joins the next through an inner vertex at half the radius.
    /// With transparency, each segment is kept or dropped whole depending on
    /// the dither row of its starting point.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_star(
        &self,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        c: u8,
        thickness: i32,
        transparency: i32,
    ) {
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() || self.encode(c).is_none() {
            return;
        }
        let (rx, ry) = (w / 2, h / 2);
        let (inner_rx, inner_ry) = (rx / 2, ry / 2);

        for t in 0..thickness.max(1) {
            let (outer_x, outer_y) = (rx - t, ry - t);
            let (inner_x, inner_y) = (inner_rx - t, inner_ry - t);
            if outer_x < 1 || outer_y < 1 {
                continue;
            }
            for (i, &(px, py)) in STAR_TIPS.iter().enumerate() {
                let (nx, ny) = STAR_TIPS[(i + 1) % STAR_TIPS.len()];
                let tip = (x0 + px * outer_x, y0 + py * outer_y);
                let inner = (
                    x0 + (px + nx) * inner_x / 2,
                    y0 + (py + ny) * inner_y / 2,
                );
                let next = (x0 + nx * outer_x, y0 + ny * outer_y);

                if coverage.row(tip.1) {
                    self.draw_line(tip.0, tip.1, inner.0, inner.1, c);
                }
                if coverage.row(inner.1) {
                    self.draw_line(inner.0, inner.1, next.0, next.1, c);
                }
            }
        }
    }

    /// Ellipse outline traced in two regions, one stepping rows and one
    /// stepping columns, so steep and shallow arcs are both gap free.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_oval(
        &self,
        x0: i32,
        y0: i32,
        w: i32,
        h: i32,
        c: u8,
        thickness: i32,
        transparency: i32,
    ) {
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let plot = |x: i32, y: i32| {
            self.put_row_dithered(x0 + x, y0 + y, code, coverage);
            self.put_row_dithered(x0 - x, y0 + y, code, coverage);
            self.put_row_dithered(x0 + x, y0 - y, code, coverage);
            self.put_row_dithered(x0 - x, y0 - y, code, coverage);
        };

        for t in 0..thickness.max(1) {
            let (a, b) = ((w / 2 - t) as i64, (h / 2 - t) as i64);
            if a < 1 || b < 1 {
                break;
            }
            let (two_a2, two_b2) = (2 * a * a, 2 * b * b);

            // Shallow region, from the tip of the x axis.
            let (mut x, mut y) = (a, 0i64);
            let mut x_change = b * b * (1 - 2 * a);
            let mut y_change = a * a;
            let mut err = 0i64;
            let (mut stop_x, mut stop_y) = (two_b2 * a, 0i64);
            while stop_x >= stop_y {
                plot(x as i32, y as i32);
                y += 1;
                stop_y += two_a2;
                err += y_change;
                y_change += two_a2;
                if 2 * err + x_change > 0 {
                    x -= 1;
                    stop_x -= two_b2;
                    err += x_change;
                    x_change += two_b2;
                }
            }

            // Steep region, from the tip of the y axis.
            let (mut x, mut y) = (0i64, b);
            let mut x_change = b * b;
            let mut y_change = a * a * (1 - 2 * b);
            let mut err = 0i64;
            let (mut stop_x, mut stop_y) = (0i64, two_a2 * b);
            while stop_x <= stop_y {
                plot(x as i32, y as i32);
                x += 1;
                stop_x += two_b2;
                err += x_change;
                x_change += two_b2;
                if 2 * err + y_change > 0 {
                    y -= 1;
                    stop_y -= two_a2;
                    err += y_change;
                    y_change += two_a2;
                }
            }
        }
    }

    /// Quadrilateral through four corners in drawing order, outlined or
    /// filled as the two triangles `1-2-3` and `1-3-4`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_quad(
        &self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        x3: i32,
        y3: i32,
        x4: i32,
        y4: i32,
        c: u8,
        filled: bool,
    ) {
        if filled {
            self.fill_triangle((x1, y1), (x2, y2), (x3, y3), c);
            self.fill_triangle((x1, y1), (x3, y3), (x4, y4), c);
        } else {
            self.draw_line(x1, y1, x2, y2, c);
            self.draw_line(x2, y2, x3, y3, c);
            self.draw_line(x3, y3, x4, y4, c);
            self.draw_line(x4, y4, x1, y1, c);
        }
    }

    /// Scanline-filled triangle.
    pub fn fill_triangle(&self, p0: (i32, i32), p1: (i32, i32), p2: (i32, i32), c: u8) {
        let Some(code) = self.encode(c) else { return };
        let mut pts = [p0, p1, p2];
        pts.sort_by_key(|p| p.1);
        let [(x0, y0), (x1, y1), (x2, y2)] = pts;

        if y0 == y2 {
            let lo = x0.min(x1).min(x2);
            let hi = x0.max(x1).max(x2);
            self.span(lo, y0, hi - lo + 1, code);
            return;
        }

        let (dx01, dy01) = (x1 - x0, y1 - y0);
        let (dx02, dy02) = (x2 - x0, y2 - y0);
        let (dx12, dy12) = (x2 - x1, y2 - y1);
        let run = |y: i32, a: i32, b: i32| {
            let (a, b) = if a > b { (b, a) } else { (a, b) };
            self.span(a, y, b - a + 1, code);
        };

        // Upper part, edges 0-1 and 0-2. Includes row y1 only when the
        // lower part is flat.
        let last = if y1 == y2 { y1 } else { y1 - 1 };
        let (mut sa, mut sb) = (0, 0);
        let mut y = y0;
        while y <= last {
            run(y, x0 + sa / dy01, x0 + sb / dy02);
            sa += dx01;
            sb += dx02;
            y += 1;
        }

        // Lower part, edges 1-2 and 0-2.
        let mut sa = dx12 * (y - y1);
        let mut sb = dx02 * (y - y0);
        while y <= y2 {
            run(y, x1 + sa / dy12, x0 + sb / dy02);
            sa += dx12;
            sb += dx02;
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gfx::tests::{lit, video};

    #[test]
    fn test_star_reaches_its_tips() {
        let mut v = video();
        v.canvas().draw_star(100, 100, 40, 20, 1, 1, 255);
        let points = lit(&v);
        for tip in [(120, 100), (80, 100), (100, 110), (100, 90)] {
            assert!(points.contains(&tip), "missing tip {tip:?}");
        }
        // The inner vertex pulls the outline in towards the centre.
        assert!(points.contains(&(105, 102)));
        assert!(!points.contains(&(100, 100)));
        assert!(!points.contains(&(115, 108)));
    }

    #[test]
    fn test_star_thickness_shrinks_inwards() {
        let mut v = video();
        v.canvas().draw_star(100, 100, 40, 20, 1, 2, 255);
        let points = lit(&v);
        assert!(points.contains(&(120, 100)));
        assert!(points.contains(&(119, 100)));
        assert!(!points.contains(&(121, 100)));
    }

    #[test]
    fn test_oval_is_closed_and_symmetric() {
        let mut v = video();
        v.canvas().draw_oval(60, 60, 40, 16, 1, 1, 255);
        let points = lit(&v);
        for p in [(80, 60), (40, 60), (60, 68), (60, 52)] {
            assert!(points.contains(&p), "missing {p:?}");
        }
        for &(x, y) in &points {
            assert!(points.contains(&(120 - x, y)));
            assert!(points.contains(&(x, 120 - y)));
        }
        // Every column between the tips has a pixel on the top arc.
        for x in 40..=80 {
            assert!(points.iter().any(|&(px, py)| px == x && py <= 60));
        }
    }

    #[test]
    fn test_oval_transparency_drops_rows() {
        let mut v = video();
        v.canvas().draw_oval(60, 60, 40, 40, 1, 1, 1);
        let points = lit(&v);
        // Threshold 0 only keeps rows whose Bayer row value is 0.
        assert!(!points.is_empty());
        assert!(points.iter().all(|&(_, y)| y % 8 == 0));
    }

    #[test]
    fn test_quad_outline() {
        let mut v = video();
        v.canvas().draw_quad(10, 10, 20, 10, 20, 20, 10, 20, 1, false);
        let points = lit(&v);
        assert_eq!(points.len(), 40);
        assert!(!points.contains(&(15, 15)));
    }

    #[test]
    fn test_filled_quad_covers_square() {
        let mut v = video();
        v.canvas().draw_quad(10, 10, 20, 10, 20, 20, 10, 20, 1, true);
        let expected: Vec<_> = (10..=20)
            .flat_map(|y| (10..=20).map(move |x| (x, y)))
            .collect();
        assert_eq!(lit(&v), expected);
    }

    #[test]
    fn test_triangle_rows() {
        let mut v = video();
        v.canvas().fill_triangle((10, 0), (0, 10), (20, 10), 1);
        let points = lit(&v);
        assert_eq!(points.iter().filter(|p| p.1 == 0).count(), 1);
        assert_eq!(points.iter().filter(|p| p.1 == 10).count(), 21);
        assert!(points.iter().all(|&(x, y)| (10 - y..=10 + y).contains(&x)));
    }

    #[test]
    fn test_flat_triangle_is_one_span() {
        let mut v = video();
        v.canvas().fill_triangle((5, 7), (1, 7), (9, 7), 1);
        assert_eq!(lit(&v), (1..=9).map(|x| (x, 7)).collect::<Vec<_>>());
    }
}
