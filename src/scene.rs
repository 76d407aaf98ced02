//! The demo picture: a spinning cube surrounded by a sampler of the other
//! primitives, redrawn every field.

use crate::gfx::image::Bitmap;
use crate::gfx::Canvas;

/// Cube corners, model space.
const CUBE_POINTS: [[f64; 3]; 8] = [
    [-20.0, 20.0, 20.0],
    [20.0, 20.0, 20.0],
    [-20.0, -20.0, 20.0],
    [20.0, -20.0, 20.0],
    [-20.0, 20.0, -20.0],
    [20.0, 20.0, -20.0],
    [-20.0, -20.0, -20.0],
    [20.0, -20.0, -20.0],
];

/// Corner indices of each face, wound so visible faces turn one way on screen.
const CUBE_FACES: [([usize; 4], u8); 6] = [
    ([0, 1, 3, 2], 1),
    ([6, 7, 5, 4], 3),
    ([1, 5, 7, 3], 5),
    ([2, 6, 4, 0], 7),
    ([2, 3, 7, 6], 9),
    ([0, 4, 5, 1], 11),
];

/// Distance from the eye to the projection plane, and to the cube centre.
const SCREEN_DISTANCE: f64 = 512.0;
const VIEWER_DISTANCE: f64 = 256.0;

const LOGO_SIZE: usize = 16;

/// A 16×16 ring, 1 bpp LSB first.
const LOGO: [u8; LOGO_SIZE * LOGO_SIZE / 8] = {
    let mut bits = [0u8; LOGO_SIZE * LOGO_SIZE / 8];
    let mut y = 0;
    while y < LOGO_SIZE {
        let mut x = 0;
        while x < LOGO_SIZE {
            let dx = 2 * x as i32 - 15;
            let dy = 2 * y as i32 - 15;
            let d = dx * dx + dy * dy;
            if d >= 121 && d <= 225 {
                let i = y * LOGO_SIZE + x;
                bits[i >> 3] |= 1 << (i & 7);
            }
            x += 1;
        }
        y += 1;
    }
    bits
};

#[derive(Debug, Default)]
pub struct Scene {
    frame: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames drawn so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Clear the canvas and draw the next frame.
    pub fn draw(&mut self, canvas: &mut Canvas<'_>) {
        let (w, h) = (canvas.width(), canvas.height());
        let white = canvas.palette().colour_max();
        let t = self.frame as i32;

        canvas.clear(0);
        canvas.draw_rect_thick(0, 0, w, h, white, 2);

        let f = self.frame as f64;
        self.cube(canvas, w / 2, h / 2, f * 0.020, f * 0.013, f * 0.017);
        canvas.draw_rect_rotated(w / 2, h / 2, 120, 120, 2, 1, 96, t);

        canvas.draw_oval(w / 4, h / 4, 48, 24, 9, 1, 255);
        canvas.draw_star(w * 3 / 4, h / 4, 40, 40, white, 2, 200);
        canvas.draw_ellipse_rotated(w / 4, h * 3 / 4, 60, 24, white, 2, 255, t * 3);
        canvas.fill_ellipse_rotated(w * 3 / 4, h * 3 / 4, 50, 20, 6, 128, -t * 2);
        canvas.fill_round_rect(w / 2 - 30, h - 34, 60, 16, 6, 4);

        if let Ok(logo) = Bitmap::new(&LOGO, LOGO_SIZE, LOGO_SIZE) {
            let size = LOGO_SIZE as i32 * (2 + (t / 16) % 3);
            canvas.draw_image(w - 32, 32, size, size, &logo, white, white, false, 255);
        }

        canvas.print_string(8, h - 16, "pico-composite", white, 0);
        let cursor = canvas.cursor();
        cursor.set_cursor(8, 8);
        cursor.set_size(1);
        cursor.set_color(white);
        canvas.write_str(&format!("FIELD {}", self.frame));

        self.frame = self.frame.wrapping_add(1);
    }

    /// Project the cube rotated by `the`, `psi` and `phi` radians and draw
    /// its front faces as filled quads.
    fn cube(&self, canvas: &Canvas<'_>, cx: i32, cy: i32, the: f64, psi: f64, phi: f64) {
        let projected = CUBE_POINTS.map(|[x, y, z]| {
            let (ry, rz) = (y * phi.cos() - z * phi.sin(), y * phi.sin() + z * phi.cos());
            let (rx, rz) = (x * the.cos() - rz * the.sin(), x * the.sin() + rz * the.cos());
            let (px, py) = (rx * psi.cos() - ry * psi.sin(), rx * psi.sin() + ry * psi.cos());
            let scale = SCREEN_DISTANCE / (VIEWER_DISTANCE - rz);
            (cx + (px * scale) as i32, cy + (py * scale) as i32)
        });

        for (corners, colour) in CUBE_FACES {
            let [a, b, c, d] = corners.map(|i| projected[i]);
            let facing = a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1);
            if facing <= 0 {
                canvas.draw_quad(a.0, a.1, b.0, b.1, c.0, c.1, d.0, d.1, colour, true);
            }
        }
    }
}
