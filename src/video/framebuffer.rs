use std::sync::atomic::{AtomicU8, Ordering};

/// A `width × height` image of stored palette bytes, row-major.
///
/// Pixels are atomics so the scan-out side can read the front buffer while
/// the application writes the back buffer. All accesses are relaxed byte
/// loads and stores, which compile to plain memory operations.
#[derive(Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Box<[AtomicU8]>,
}

impl Framebuffer {
    /// Allocate a buffer filled with `fill`. Allocation failure aborts.
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        let pixels = (0..width * height).map(|_| AtomicU8::new(fill)).collect();
        Self { width, height, pixels }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The bytes of row `y`, as handed to the data DMA channel.
    #[inline]
    pub fn row(&self, y: usize) -> &[AtomicU8] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, x: usize, y: usize, value: u8) {
        self.pixels[y * self.width + x].store(value, Ordering::Relaxed);
    }

    /// Store `value` into `len` pixels of row `y` starting at `x`.
    #[inline]
    pub fn fill_span(&self, x: usize, y: usize, len: usize, value: u8) {
        let start = y * self.width + x;
        for p in &self.pixels[start..start + len] {
            p.store(value, Ordering::Relaxed);
        }
    }

    pub fn fill(&self, value: u8) {
        for p in self.pixels.iter() {
            p.store(value, Ordering::Relaxed);
        }
    }

    /// Address of the first pixel; identifies the allocation, not its contents.
    pub fn as_ptr(&self) -> *const u8 {
        self.pixels.as_ptr().cast()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.pixels.iter().map(|p| p.load(Ordering::Relaxed)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_filled() {
        let fb = Framebuffer::new(4, 3, 0x10);
        assert_eq!(fb.to_vec(), vec![0x10; 12]);
    }

    #[test]
    fn test_rows_are_contiguous() {
        let fb = Framebuffer::new(4, 3, 0);
        fb.set(1, 2, 9);
        fb.fill_span(0, 1, 4, 7);
        let row: Vec<u8> = fb.row(2).iter().map(|p| p.load(Ordering::Relaxed)).collect();
        assert_eq!(row, vec![0, 9, 0, 0]);
        assert_eq!(fb.to_vec()[4..8], [7, 7, 7, 7]);
        assert_eq!(fb.get(1, 2), 9);
    }
}
