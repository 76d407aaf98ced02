use super::{Canvas, Coverage};
use crate::video::VideoError;

/// How far past the left and top edges image rows are still walked.
const CLIP_MARGIN: i32 = 10;

/// A 1 bpp image, LSB first (bit 0 is the leftmost pixel of its byte),
/// each row padded to a whole byte.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> Bitmap<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self, VideoError> {
        let needed = Self::stride(width) / 8 * height;
        if data.len() < needed {
            return Err(VideoError::BitmapTooShort {
                width,
                height,
                needed,
                len: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Row length in bits.
    fn stride(width: usize) -> usize {
        (width + 7) & !7
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at `(col, row)` is set.
    pub fn bit(&self, col: usize, row: usize) -> bool {
        let index = row * Self::stride(self.width) + col;
        (self.data[index >> 3] >> (index & 7)) & 1 != 0
    }
}

impl Canvas<'_> {
    /// Scale `bitmap` to `target_w × target_h` and draw it centred on `(x, y)`.
    ///
    /// Set bits draw `color`, gated by the 2-D dither (or the row dither when
    /// `fast`). Clear bits draw `bg` with no dither, or nothing when
    /// `bg == color`. Targets up to twice the source size sample the source
    /// per destination pixel; larger ones stretch each source pixel into a
    /// block.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &self,
        x: i32,
        y: i32,
        target_w: i32,
        target_h: i32,
        bitmap: &Bitmap<'_>,
        color: u8,
        bg: u8,
        fast: bool,
        transparency: i32,
    ) {
        let coverage = Coverage::from_transparency(transparency);
        if coverage.is_clear() || target_w <= 0 || target_h <= 0 {
            return;
        }
        let (bw, bh) = (bitmap.width() as i32, bitmap.height() as i32);
        if bw == 0 || bh == 0 {
            return;
        }
        let Some(fg_code) = self.encode(color) else { return };
        let bg_code = if bg == color {
            None
        } else {
            match self.encode(bg) {
                Some(code) => Some(code),
                None => return,
            }
        };
        let fg_visible = |px: i32, py: i32| {
            if fast {
                coverage.row(py)
            } else {
                coverage.pixel(px, py)
            }
        };

        let x_start = x - (target_w >> 1);
        let y_start = y - (target_h >> 1);
        let (width, height) = (self.width(), self.height());

        if target_w <= bw * 2 && target_h <= bh * 2 {
            for j in 0..target_h {
                let py = y_start + j;
                if py >= height {
                    break;
                }
                if py < -CLIP_MARGIN {
                    continue;
                }
                let src_y = (j * bh / target_h) as usize;
                for i in 0..target_w {
                    let px = x_start + i;
                    if px < -CLIP_MARGIN {
                        continue;
                    }
                    if px >= width {
                        break;
                    }
                    let src_x = (i * bw / target_w) as usize;
                    if bitmap.bit(src_x, src_y) {
                        if fg_visible(px, py) {
                            self.put(px, py, fg_code);
                        }
                    } else if let Some(bg_code) = bg_code {
                        self.put(px, py, bg_code);
                    }
                }
            }
            return;
        }

        let block_w = (target_w + bw - 1) / bw;
        let block_h = (target_h + bh - 1) / bh;
        for j in 0..bh {
            let top = y_start + j * target_h / bh;
            if top >= height {
                break;
            }
            if top + block_h < -CLIP_MARGIN {
                continue;
            }
            for i in 0..bw {
                let left = x_start + i * target_w / bw;
                if left >= width {
                    break;
                }
                if left + block_w < -CLIP_MARGIN {
                    continue;
                }
                let set = bitmap.bit(i as usize, j as usize);
                for py in top..top + block_h {
                    match (set, bg_code) {
                        (false, Some(bg_code)) => self.span(left, py, block_w, bg_code),
                        (false, None) => {}
                        (true, _) if fast => {
                            if coverage.row(py) {
                                self.span(left, py, block_w, fg_code);
                            }
                        }
                        (true, _) => {
                            for px in left..left + block_w {
                                self.put_dithered(px, py, fg_code, coverage);
                            }
                        }
                    }
                }
            }
        }
    }
}
