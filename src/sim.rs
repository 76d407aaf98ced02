//! Host stand-in for the two output state machines.
//!
//! [`ScanOut`] plays the part of the DMA channels and the monitor: it calls
//! the line handlers once per scanline, latches whatever they arm, and turns
//! the latched sync codes and pixel rows into an RGBA picture of the field.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, TrySendError};
use log::{debug, info, trace};

use crate::dma::DmaChannel;
use crate::video::palette::{Palette, Rgba, BORDER_FLAG};
use crate::video::waveform::{BORDER_START, TABLE_LEN};
use crate::video::LineEngine;

/// Border shown left and right of the picture on active lines, in pixels.
pub const BORDER_MARGIN: usize = 16;

/// One scanned field: every non-sync line, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl FieldImage {
    /// The pixels as packed RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }
}

/// Sync channel latch: keeps a copy of the last table it was armed with.
#[derive(Debug)]
struct SyncLatch {
    codes: [u16; TABLE_LEN],
}

impl DmaChannel for SyncLatch {
    type Word = AtomicU16;

    fn arm(&mut self, source: &[AtomicU16]) {
        for (dst, src) in self.codes.iter_mut().zip(source) {
            *dst = src.load(Ordering::Relaxed);
        }
    }
}

/// Pixel channel latch: keeps a copy of the last row it was armed with.
#[derive(Debug, Default)]
struct PixelLatch {
    row: Vec<u8>,
}

impl DmaChannel for PixelLatch {
    type Word = AtomicU8;

    fn arm(&mut self, source: &[AtomicU8]) {
        self.row.clear();
        self.row.extend(source.iter().map(|p| p.load(Ordering::Relaxed)));
    }
}

/// Drives a [`LineEngine`] at line rate and assembles what it outputs.
#[derive(Debug)]
pub struct ScanOut {
    engine: LineEngine,
    sync: SyncLatch,
    data: PixelLatch,
    stop: Arc<AtomicBool>,
    paced: bool,
}

impl ScanOut {
    pub fn new(engine: LineEngine) -> Self {
        Self {
            engine,
            sync: SyncLatch { codes: [0; TABLE_LEN] },
            data: PixelLatch::default(),
            stop: Arc::new(AtomicBool::new(false)),
            paced: true,
        }
    }

    /// Run as fast as possible instead of at the standard's field rate.
    pub fn unpaced(mut self) -> Self {
        self.paced = false;
        self
    }

    /// Flag that ends [`run`](Self::run) after the current field.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Scan one whole field and return the picture.
    pub fn scan_field(&mut self) -> FieldImage {
        let palette = self.engine.palette();
        let picture = self.engine.data_channel().transfer_len;
        let width = picture + 2 * BORDER_MARGIN;
        let mut pixels = Vec::with_capacity(width * visible_lines(&self.engine));

        for _ in 0..self.engine.standard().total_lines() {
            self.engine.on_sync_complete(&mut self.sync);
            let codes = &self.sync.codes;

            if codes[BORDER_START] & BORDER_FLAG != 0 {
                let border = border_rgba(palette, codes[BORDER_START]);
                pixels.extend(std::iter::repeat(border).take(width));
            } else if codes[BORDER_START..TABLE_LEN - 1].contains(&0) {
                let border = border_rgba(palette, codes[TABLE_LEN - 1]);
                pixels.extend(std::iter::repeat(border).take(BORDER_MARGIN));
                if self.engine.on_pixels_wanted(&mut self.data) {
                    let row = self.data.row.iter().take(picture);
                    pixels.extend(row.map(|&code| palette.to_rgba(code)));
                    let short = picture.saturating_sub(self.data.row.len());
                    pixels.extend(std::iter::repeat(Rgba::BLACK).take(short));
                } else {
                    trace!("scan-out: pixel line skipped");
                    pixels.extend(std::iter::repeat(Rgba::BLACK).take(picture));
                }
                pixels.extend(std::iter::repeat(border).take(BORDER_MARGIN));
            }
        }

        FieldImage {
            width,
            height: pixels.len() / width,
            pixels,
        }
    }

    /// Scan fields until the stop flag is set or `fields` is disconnected.
    ///
    /// A field is dropped rather than queued when the consumer is behind.
    pub fn run(mut self, fields: Sender<FieldImage>) {
        let standard = self.engine.standard();
        let period = Duration::from_nanos(standard.total_lines() as u64 * standard.line_period_ns());
        info!(
            "scan-out: {:?}, {} lines, sync divider {}, subcarrier {} Hz (divider {})",
            standard,
            standard.total_lines(),
            standard.sync_divider(),
            standard.subcarrier_hz(),
            standard.subcarrier_divider(),
        );

        let mut deadline = Instant::now();
        while !self.stop.load(Ordering::Relaxed) {
            let field = self.scan_field();
            match fields.try_send(field) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }

            if self.paced {
                deadline += period;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                } else {
                    deadline = now;
                }
            }
        }
        debug!("scan-out: stopped");
    }
}

/// Number of lines in a field that show picture or border.
fn visible_lines(engine: &LineEngine) -> usize {
    let standard = engine.standard();
    (1..=standard.total_lines())
        .filter(|&line| standard.classify(line).is_visible())
        .count()
}

fn border_rgba(palette: Palette, code: u16) -> Rgba {
    palette.to_rgba((code & 0xFF) as u8)
}
