use super::tables::{degrees, sin_cos_1024};
use super::{Canvas, Coverage};

impl Canvas<'_> {
    /// Draw the runs of row `y` between `x_from..=x_to` where `inside` holds.
    pub(crate) fn fill_spans_where(
        &self,
        y: i32,
        x_from: i32,
        x_to: i32,
        code: u8,
        inside: impl Fn(i32) -> bool,
    ) {
        let mut start = None;
        for x in x_from..=x_to {
            match (inside(x), start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    self.span(s, y, x - s, code);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            self.span(s, y, x_to + 1 - s, code);
        }
    }

    /// Outline covering columns `x..x+w` and rows `y..y+h`.
    pub fn draw_rect(&self, x: i32, y: i32, w: i32, h: i32, c: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        self.rect_outline(x, y, w, h, code);
    }

    fn rect_outline(&self, x: i32, y: i32, w: i32, h: i32, code: u8) {
        self.span(x, y, w, code);
        self.span(x, y + h - 1, w, code);
        self.column(x, y, h, code);
        self.column(x + w - 1, y, h, code);
    }

    pub fn fill_rect(&self, x: i32, y: i32, w: i32, h: i32, c: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        for row in y.max(0)..y.saturating_add(h).min(self.height()) {
            self.span(x, row, w, code);
        }
    }

    /// [`draw_rect`](Self::draw_rect) centred on `(x, y)`.
    pub fn draw_rect_center(&self, x: i32, y: i32, w: i32, h: i32, c: u8) {
        self.draw_rect(x - (w >> 1), y - (h >> 1), w, h, c);
    }

    pub fn fill_rect_center(&self, x: i32, y: i32, w: i32, h: i32, c: u8) {
        self.fill_rect(x - (w >> 1), y - (h >> 1), w, h, c);
    }

    /// Outline `thickness` pixels wide, growing inwards.
    pub fn draw_rect_thick(&self, x: i32, y: i32, w: i32, h: i32, c: u8, thickness: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        for i in 0..thickness.max(1) {
            let (iw, ih) = (w - 2 * i, h - 2 * i);
            if iw <= 0 || ih <= 0 {
                break;
            }
            self.rect_outline(x + i, y + i, iw, ih, code);
        }
    }

    pub fn draw_rect_center_thick(&self, x: i32, y: i32, w: i32, h: i32, c: u8, thickness: i32) {
        self.draw_rect_thick(x - (w >> 1), y - (h >> 1), w, h, c, thickness);
    }

    /// Centred outline of `thickness` nested rectangles whose rows are
    /// dithered by `transparency`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect_dithered(
        &self,
        x: i32,
        y: i32,
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
        let (left, top) = (x.saturating_sub(w >> 1), y.saturating_sub(h >> 1));

        for i in 0..thickness.max(1) {
            let (iw, ih) = (w - 2 * i, h - 2 * i);
            if iw <= 0 || ih <= 0 {
                break;
            }
            let (l, t) = (left.saturating_add(i), top.saturating_add(i));
            let (r, b) = (l.saturating_add(iw - 1), t.saturating_add(ih - 1));
            if coverage.row(t) {
                self.span(l, t, iw, code);
            }
            if coverage.row(b) {
                self.span(l, b, iw, code);
            }
            for row in t.max(0)..=b.min(self.height() - 1) {
                self.put_row_dithered(l, row, code, coverage);
                self.put_row_dithered(r, row, code, coverage);
            }
        }
    }

    /// Centred filled rectangle with dithered rows.
    pub fn fill_rect_dithered(&self, x: i32, y: i32, w: i32, h: i32, c: u8, transparency: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        let coverage = Coverage::from_transparency(transparency);
        let Some(code) = self.encode(c) else { return };
        let (left, top) = (x.saturating_sub(w >> 1), y.saturating_sub(h >> 1));
        for row in top.max(0)..top.saturating_add(h).min(self.height()) {
            if coverage.row(row) {
                self.span(left, row, w, code);
            }
        }
    }

    /// Outline of a `w × h` rectangle centred on `(x, y)` and rotated by
    /// `angle` degrees.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect_rotated(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        c: u8,
        thickness: i32,
        transparency: i32,
        angle: i32,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        match degrees(angle) {
            0 | 180 => return self.draw_rect_dithered(x, y, w, h, c, thickness, transparency),
            90 | 270 => return self.draw_rect_dithered(x, y, h, w, c, thickness, transparency),
            _ => {}
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let (sin, cos) = sin_cos_1024(angle);
        let plot = |fx: i32, fy: i32| {
            let px = x + ((fx * cos - fy * sin) >> 10);
            let py = y + ((fx * sin + fy * cos) >> 10);
            self.put_row_dithered(px, py, code, coverage);
        };

        for i in 0..thickness.max(1) {
            let (iw, ih) = (w - 2 * i, h - 2 * i);
            if iw <= 0 || ih <= 0 {
                break;
            }
            let (left, top) = (-iw / 2, -ih / 2);
            let (right, bottom) = (left + iw - 1, top + ih - 1);
            for fx in left..=right {
                plot(fx, top);
                plot(fx, bottom);
            }
            for fy in top..=bottom {
                plot(left, fy);
                plot(right, fy);
            }
        }
    }

    /// Filled `w × h` rectangle centred on `(x, y)` and rotated by `angle`
    /// degrees. Each screen pixel of the rotated bounding box is mapped back
    /// into the rectangle, so the fill has no gaps.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_rect_rotated(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        c: u8,
        transparency: i32,
        angle: i32,
    ) {
        if w <= 0 || h <= 0 {
            return;
        }
        match degrees(angle) {
            0 | 180 => return self.fill_rect_dithered(x, y, w, h, c, transparency),
            90 | 270 => return self.fill_rect_dithered(x, y, h, w, c, transparency),
            _ => {}
        }
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let (sin, cos) = sin_cos_1024(angle);
        let (left, top) = (-(w >> 1), -(h >> 1));
        let (hw, hh) = (w >> 1, h >> 1);
        let bound_w = ((hw * cos.abs() + hh * sin.abs()) >> 10) + 1;
        let bound_h = ((hw * sin.abs() + hh * cos.abs()) >> 10) + 1;

        for sy in -bound_h..=bound_h {
            let row = y + sy;
            if row < 0 || row >= self.height() || !coverage.row(row) {
                continue;
            }
            self.fill_spans_where(row, x - bound_w, x + bound_w, code, |px| {
                let sx = px - x;
                let lx = (sx * cos + sy * sin) >> 10;
                let ly = (sy * cos - sx * sin) >> 10;
                lx >= left && lx < left + w && ly >= top && ly < top + h
            });
        }
    }

    /// Outline with quarter-circle corners of radius `r`.
    pub fn draw_round_rect(&self, x: i32, y: i32, w: i32, h: i32, r: i32, c: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let r = r.clamp(0, w.min(h) / 2);
        self.span(x + r, y, w - 2 * r, code);
        self.span(x + r, y + h - 1, w - 2 * r, code);
        self.column(x, y + r, h - 2 * r, code);
        self.column(x + w - 1, y + r, h - 2 * r, code);
        self.circle_corners(x + r, y + r, r, 0x1, code);
        self.circle_corners(x + w - r - 1, y + r, r, 0x2, code);
        self.circle_corners(x + w - r - 1, y + h - r - 1, r, 0x4, code);
        self.circle_corners(x + r, y + h - r - 1, r, 0x8, code);
    }

    pub fn fill_round_rect(&self, x: i32, y: i32, w: i32, h: i32, r: i32, c: u8) {
        if w <= 0 || h <= 0 {
            return;
        }
        let Some(code) = self.encode(c) else { return };
        let r = r.clamp(0, w.min(h) / 2);
        for row in y.max(0)..y.saturating_add(h).min(self.height()) {
            self.span(x.saturating_add(r), row, w - 2 * r, code);
        }
        let (left, right) = (x.saturating_add(r), x.saturating_add(w - r - 1));
        let top = y.saturating_add(r);
        self.fill_circle_corners(right, top, r, 0x1, h - 2 * r - 1, code);
        self.fill_circle_corners(left, top, r, 0x2, h - 2 * r - 1, code);
    }
}

#[cfg(test)]
mod tests {
    use crate::gfx::tables::BAYER_ROW;
    use crate::gfx::tests::{lit, video};

    #[test]
    fn test_fill_rect_clips_to_screen() {
        let mut v = video();
        v.canvas().fill_rect(250, 235, 20, 20, 1);
        let points = lit(&v);
        assert_eq!(points.len(), 6 * 5);
        assert!(points.iter().all(|&(x, y)| x >= 250 && y >= 235));
    }

    #[test]
    fn test_fill_rect_fully_off_screen() {
        let mut v = video();
        let c = v.canvas();
        c.fill_rect(-30, 10, 20, 20, 1);
        c.fill_rect(10, 300, 20, 20, 1);
        c.fill_rect(10, 10, 0, 20, 1);
        c.fill_rect(10, 10, -5, 20, 1);
        drop(c);
        assert!(lit(&v).is_empty());
    }

    #[test]
    fn test_extreme_heights_clip() {
        let mut v = video();
        v.canvas().fill_rect(10, 10, 10, i32::MAX, 1);
        let points = lit(&v);
        assert_eq!(points.len(), 230 * 10);
        assert_eq!(points.last(), Some(&(19, 239)));

        let mut v = video();
        let c = v.canvas();
        c.fill_rect(0, i32::MIN, 5, i32::MAX, 1);
        c.fill_rect_dithered(20, i32::MAX, 4, i32::MAX, 1, 255);
        drop(c);
        assert!(lit(&v).is_empty());

        let mut v = video();
        v.canvas().fill_rect_dithered(20, 0, 4, i32::MAX, 1, 255);
        let points = lit(&v);
        assert_eq!(points.len(), 240 * 4);
        assert!(points.iter().all(|&(x, _)| (18..22).contains(&x)));

        let mut v = video();
        v.canvas().draw_rect_dithered(20, 120, 5, i32::MAX, 1, 1, 255);
        let points = lit(&v);
        assert_eq!(points.len(), 240 * 2);
        assert!(points.iter().all(|&(x, _)| x == 18 || x == 22));
    }

    #[test]
    fn test_tall_round_rect_clips() {
        let mut v = video();
        v.canvas().fill_round_rect(10, 10, 20, i32::MAX, 4, 1);
        let points = lit(&v);
        assert!(!points.contains(&(10, 10)));
        assert!(points.contains(&(10, 100)));
        assert!(points.contains(&(29, 100)));
        assert_eq!(points.iter().filter(|p| p.1 == 239).count(), 20);
        assert!(points.iter().all(|&(x, y)| (10..30).contains(&x) && y >= 10));
    }

    #[test]
    fn test_draw_rect_edges_are_inclusive() {
        let mut v = video();
        v.canvas().draw_rect(10, 20, 5, 4, 1);
        let points = lit(&v);
        assert_eq!(points.len(), 2 * 5 + 2 * 2);
        for p in [(10, 20), (14, 20), (10, 23), (14, 23)] {
            assert!(points.contains(&p), "missing corner {p:?}");
        }
        assert!(!points.contains(&(15, 20)));
        assert!(!points.contains(&(10, 24)));
    }

    #[test]
    fn test_centered_rect() {
        let mut v = video();
        v.canvas().fill_rect_center(50, 50, 10, 6, 1);
        let points = lit(&v);
        assert_eq!(points.first(), Some(&(45, 47)));
        assert_eq!(points.last(), Some(&(54, 52)));
    }

    #[test]
    fn test_thick_rect_grows_inwards() {
        let mut v = video();
        v.canvas().draw_rect_thick(0, 0, 10, 10, 1, 2);
        let points = lit(&v);
        assert_eq!(points.len(), 100 - 36);
        assert!(!points.contains(&(2, 2)));
        assert!(points.contains(&(1, 1)));
    }

    #[test]
    fn test_dithered_fill_skips_rows() {
        let mut v = video();
        v.canvas().fill_rect_dithered(128, 120, 16, 16, 1, 128);
        let rows: Vec<i32> = {
            let mut r: Vec<i32> = lit(&v).iter().map(|p| p.1).collect();
            r.dedup();
            r
        };
        let expected: Vec<i32> = (112..128)
            .filter(|y| BAYER_ROW[(y & 7) as usize] <= 32)
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_dithered_outline_opaque_matches_centered_outline() {
        let mut a = video();
        a.canvas().draw_rect_dithered(60, 60, 21, 13, 1, 1, 255);
        let mut b = video();
        b.canvas().draw_rect_center(60, 60, 21, 13, 1);
        assert_eq!(lit(&a), lit(&b));

        let mut z = video();
        z.canvas().draw_rect_dithered(60, 60, 21, 13, 1, 1, 0);
        assert!(lit(&z).is_empty());
    }

    #[test]
    fn test_rotated_right_angles_use_fast_path() {
        let mut a = video();
        a.canvas().fill_rect_rotated(100, 100, 30, 10, 1, 255, 90);
        let mut b = video();
        b.canvas().fill_rect_center(100, 100, 10, 30, 1);
        assert_eq!(lit(&a), lit(&b));

        let mut a = video();
        a.canvas().draw_rect_rotated(100, 100, 30, 10, 1, 1, 255, -180);
        let mut b = video();
        b.canvas().draw_rect_center(100, 100, 30, 10, 1);
        assert_eq!(lit(&a), lit(&b));
    }

    #[test]
    fn test_rotated_fill_is_solid() {
        let mut v = video();
        v.canvas().fill_rect_rotated(128, 120, 40, 20, 1, 255, 45);
        let points = lit(&v);
        // Area of the rotated rectangle, give or take the rounded edges.
        assert!((700..=900).contains(&points.len()), "{} pixels", points.len());
        assert!(points.contains(&(128, 120)));
        // Interior rows have no holes.
        let row: Vec<i32> = points.iter().filter(|p| p.1 == 120).map(|p| p.0).collect();
        assert_eq!(row.len() as i32, row.last().unwrap() - row.first().unwrap() + 1);
    }

    #[test]
    fn test_rotated_outline_stays_near_centre() {
        let mut v = video();
        v.canvas().draw_rect_rotated(128, 120, 40, 20, 1, 1, 255, 30);
        let points = lit(&v);
        assert!(!points.is_empty());
        assert!(points.iter().all(|&(x, y)| (x - 128).pow(2) + (y - 120).pow(2) <= 24 * 24));
        assert!(!points.contains(&(128, 120)));
    }

    #[test]
    fn test_round_rect() {
        let mut v = video();
        v.canvas().draw_round_rect(10, 10, 30, 20, 5, 1);
        let points = lit(&v);
        assert!(!points.contains(&(10, 10)));
        assert!(points.contains(&(15, 10)));
        assert!(points.contains(&(10, 15)));
        assert!(points.contains(&(39, 24)));

        let mut f = video();
        f.canvas().fill_round_rect(10, 10, 30, 20, 5, 1);
        let filled = lit(&f);
        assert!(!filled.contains(&(10, 10)));
        assert!(filled.contains(&(25, 20)));
        assert!(filled.contains(&(10, 20)));
        assert!(filled.contains(&(39, 20)));
        assert!(filled.len() < 30 * 20);
    }
}
