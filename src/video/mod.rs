pub mod framebuffer;
pub mod palette;
pub mod standard;
pub mod waveform;

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, TryLockError};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use crate::dma::{PixelChannel, SyncChannel};
use crate::gfx::text::TextCursor;
use crate::gfx::Canvas;
use framebuffer::Framebuffer;
use palette::Palette;
use standard::{ClockDivider, LineKind, LineMap, Mode, VideoStandard};
use waveform::{Waveforms, TABLE_LEN};

/// Poll interval of [`Video::wait_vblank`].
const VBLANK_POLL: Duration = Duration::from_micros(4);

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("colour {colour} is above the palette maximum {max}")]
    ColourOutOfRange { colour: u8, max: u8 },
    #[error("unknown resolution mode {0}")]
    InvalidMode(u8),
    #[error("{width}x{height} bitmap needs {needed} bytes, got {len}")]
    BitmapTooShort {
        width: usize,
        height: usize,
        needed: usize,
        len: usize,
    },
}

/// Start-up configuration. The defaults follow the cargo features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    pub standard: VideoStandard,
    pub palette: Palette,
    pub mode: Mode,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            standard: VideoStandard::BUILD,
            palette: Palette::BUILD,
            mode: Mode::default(),
        }
    }
}

/// Transfer setup of the pixel DMA channel and its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChannelConfig {
    /// Bytes per transfer, one per pixel.
    pub transfer_len: usize,
    pub clock_divider: ClockDivider,
}

/// The framebuffer pair. Role labels live outside, in [`Shared::front`].
#[derive(Debug)]
pub(crate) struct Screen {
    mode: Mode,
    buffers: [Framebuffer; 2],
}

impl Screen {
    fn new(mode: Mode, fill: u8) -> Self {
        let (w, h) = (mode.width(), mode.height());
        Self {
            mode,
            buffers: [Framebuffer::new(w, h, fill), Framebuffer::new(w, h, fill)],
        }
    }

    pub(crate) fn buffer(&self, index: usize) -> &Framebuffer {
        &self.buffers[index]
    }
}

/// State shared between the application and the line handlers.
#[derive(Debug)]
struct Shared {
    standard: VideoStandard,
    palette: Palette,
    line_map: LineMap,
    waveforms: Waveforms,
    screen: RwLock<Screen>,
    /// Index of the front buffer in [`Screen::buffers`].
    front: AtomicUsize,
    /// Scanline about to be classified, `1..=total_lines`.
    vline: AtomicU16,
    /// Framebuffer row the feeder hands out next.
    bline: AtomicUsize,
    frame_count: AtomicU32,
    parity: AtomicBool,
    transfer_len: AtomicUsize,
    pixel_divider: AtomicU32,
}

impl Shared {
    fn read_screen(&self) -> RwLockReadGuard<'_, Screen> {
        self.screen.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Application-side handle: owns the back buffer and paces frames.
///
/// Not `Clone`: drawing, swapping and mode changes all borrow it mutably, so
/// a mode change cannot free a buffer a [`Canvas`] is still drawing into.
#[derive(Debug)]
pub struct Video {
    shared: Arc<Shared>,
    cursor: TextCursor,
}

/// Hardware-side handle holding the two line-rate interrupt handlers.
#[derive(Debug, Clone)]
pub struct LineEngine {
    shared: Arc<Shared>,
}

impl Video {
    /// Allocate both framebuffers, clear them to colour 0, set the border to
    /// colour 0 and return the application and hardware halves.
    pub fn new(config: VideoConfig) -> (Video, LineEngine) {
        let VideoConfig { standard, palette, mode } = config;
        let black = palette.colour_base();

        let shared = Arc::new(Shared {
            standard,
            palette,
            line_map: LineMap::new(standard),
            waveforms: Waveforms::new(standard, palette),
            screen: RwLock::new(Screen::new(mode, black)),
            front: AtomicUsize::new(0),
            vline: AtomicU16::new(1),
            bline: AtomicUsize::new(0),
            frame_count: AtomicU32::new(0),
            parity: AtomicBool::new(false),
            transfer_len: AtomicUsize::new(mode.width()),
            pixel_divider: AtomicU32::new(mode.pixel_divider(standard).0),
        });
        shared.waveforms.set_border(palette.colour_base() as u16);

        info!(
            "video: {:?} {}x{} ({:?} palette), sync divider {}, pixel divider {}",
            standard,
            mode.width(),
            mode.height(),
            palette,
            standard.sync_divider(),
            mode.pixel_divider(standard),
        );

        let engine = LineEngine { shared: Arc::clone(&shared) };
        let video = Video {
            shared,
            cursor: TextCursor::new(palette.colour_max()),
        };
        (video, engine)
    }

    pub fn standard(&self) -> VideoStandard {
        self.shared.standard
    }

    pub fn palette(&self) -> Palette {
        self.shared.palette
    }

    pub fn mode(&self) -> Mode {
        self.shared.read_screen().mode
    }

    pub fn width(&self) -> usize {
        self.mode().width()
    }

    pub fn height(&self) -> usize {
        self.mode().height()
    }

    /// Number of completed fields.
    pub fn frame_count(&self) -> u32 {
        self.shared.frame_count.load(Ordering::Acquire)
    }

    /// Field parity, toggled on every field wrap.
    pub fn parity(&self) -> bool {
        self.shared.parity.load(Ordering::Relaxed)
    }

    /// `(vline, bline)`: next scanline to classify and next row to feed.
    pub fn line_position(&self) -> (u16, usize) {
        (
            self.shared.vline.load(Ordering::Relaxed),
            self.shared.bline.load(Ordering::Relaxed),
        )
    }

    /// Block until the field counter moves. Returns the new count.
    ///
    /// Spins with a short sleep; there is no timeout, so the line handlers
    /// must be running.
    pub fn wait_vblank(&self) -> u32 {
        let start = self.frame_count();
        loop {
            thread::sleep(VBLANK_POLL);
            let now = self.frame_count();
            if now != start {
                return now;
            }
        }
    }

    /// Exchange the front and back roles. Buffer contents are not copied.
    ///
    /// Call right after [`wait_vblank`](Self::wait_vblank) to avoid tearing.
    pub fn swap(&mut self) {
        let old = self.shared.front.fetch_xor(1, Ordering::AcqRel);
        debug!("swap: front buffer {} -> {}", old, old ^ 1);
    }

    /// Reallocate both buffers for `mode` and reprogram the pixel channel.
    ///
    /// Waits for a vblank first. Handlers that fire while the buffers are
    /// being replaced skip their line instead of blocking.
    pub fn set_mode(&mut self, mode: Mode) {
        self.wait_vblank();

        let s = &*self.shared;
        let divider = mode.pixel_divider(s.standard);
        {
            let mut screen = s.screen.write().unwrap_or_else(PoisonError::into_inner);
            *screen = Screen::new(mode, s.palette.colour_base());
            s.front.store(0, Ordering::Release);
            s.transfer_len.store(mode.width(), Ordering::Release);
            s.pixel_divider.store(divider.0, Ordering::Release);
        }
        info!(
            "video: mode {:?} ({}x{}), pixel divider {}",
            mode,
            mode.width(),
            mode.height(),
            divider
        );
    }

    /// Recolour the border. Out-of-range colours leave the tables untouched.
    pub fn set_border_colour(&self, colour: u8) -> Result<(), VideoError> {
        let palette = self.shared.palette;
        let code = palette.border_code(colour).ok_or_else(|| {
            warn!("video: rejected border colour {}", colour);
            VideoError::ColourOutOfRange {
                colour,
                max: palette.colour_max(),
            }
        })?;
        self.shared.waveforms.set_border(code);
        debug!("video: border colour {}", colour);
        Ok(())
    }

    pub fn data_channel(&self) -> DataChannelConfig {
        DataChannelConfig {
            transfer_len: self.shared.transfer_len.load(Ordering::Acquire),
            clock_divider: ClockDivider(self.shared.pixel_divider.load(Ordering::Acquire)),
        }
    }

    /// Current contents of one waveform table.
    pub fn waveform(&self, kind: LineKind) -> [u16; TABLE_LEN] {
        self.shared.waveforms.snapshot(kind)
    }

    /// Drawing surface over the back buffer.
    pub fn canvas(&mut self) -> Canvas<'_> {
        let screen = self.shared.read_screen();
        let back = self.shared.front.load(Ordering::Acquire) ^ 1;
        Canvas::new(screen, back, self.shared.palette, &mut self.cursor)
    }

    pub fn front_snapshot(&self) -> Vec<u8> {
        let screen = self.shared.read_screen();
        screen.buffer(self.shared.front.load(Ordering::Acquire)).to_vec()
    }

    pub fn back_snapshot(&self) -> Vec<u8> {
        let screen = self.shared.read_screen();
        screen.buffer(self.shared.front.load(Ordering::Acquire) ^ 1).to_vec()
    }

    /// Identity of the front allocation, for checking that swaps never copy.
    pub fn front_ptr(&self) -> *const u8 {
        let screen = self.shared.read_screen();
        screen.buffer(self.shared.front.load(Ordering::Acquire)).as_ptr()
    }

    pub fn back_ptr(&self) -> *const u8 {
        let screen = self.shared.read_screen();
        screen.buffer(self.shared.front.load(Ordering::Acquire) ^ 1).as_ptr()
    }
}

impl LineEngine {
    pub fn standard(&self) -> VideoStandard {
        self.shared.standard
    }

    pub fn palette(&self) -> Palette {
        self.shared.palette
    }

    /// Transfer setup the pixel channel should currently be using.
    pub fn data_channel(&self) -> DataChannelConfig {
        DataChannelConfig {
            transfer_len: self.shared.transfer_len.load(Ordering::Acquire),
            clock_divider: ClockDivider(self.shared.pixel_divider.load(Ordering::Acquire)),
        }
    }

    /// Sync DMA completion: arm the waveform for the current scanline, then
    /// advance to the next one, wrapping into a new field.
    pub fn on_sync_complete<C: SyncChannel>(&self, channel: &mut C) -> LineKind {
        let s = &*self.shared;
        let line = s.vline.load(Ordering::Relaxed);
        let kind = s.line_map.get(line);
        channel.arm(s.waveforms.get(kind));

        if line >= s.standard.total_lines() {
            s.vline.store(1, Ordering::Relaxed);
            // Lock the picture to the field so it cannot roll.
            s.bline.store(0, Ordering::Relaxed);
            s.parity.fetch_xor(true, Ordering::Relaxed);
            s.frame_count.fetch_add(1, Ordering::AcqRel);
        } else {
            s.vline.store(line + 1, Ordering::Relaxed);
        }
        kind
    }

    /// Pixel state machine wants its next row: arm it with the next row of
    /// the front buffer.
    ///
    /// Returns `false` if the line was skipped because a mode change holds
    /// the buffers.
    pub fn on_pixels_wanted<C: PixelChannel>(&self, channel: &mut C) -> bool {
        let s = &*self.shared;
        let screen = match s.screen.try_read() {
            Ok(screen) => screen,
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
            Err(TryLockError::WouldBlock) => return false,
        };
        let front = screen.buffer(s.front.load(Ordering::Acquire));

        let mut line = s.bline.load(Ordering::Relaxed);
        if line >= front.height() {
            line = 0;
        }
        channel.arm(front.row(line));

        let next = line + 1;
        s.bline.store(if next >= front.height() { 0 } else { next }, Ordering::Relaxed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dma::DmaChannel;
    use std::sync::atomic::AtomicU8;
    use test_log::test;

    /// Copies whatever it is armed with, like a DMA reading the buffer.
    #[derive(Default)]
    struct Latch<T> {
        words: Vec<T>,
        arms: usize,
    }

    impl DmaChannel for Latch<u16> {
        type Word = AtomicU16;
        fn arm(&mut self, source: &[AtomicU16]) {
            self.words = source.iter().map(|w| w.load(Ordering::Relaxed)).collect();
            self.arms += 1;
        }
    }

    impl DmaChannel for Latch<u8> {
        type Word = AtomicU8;
        fn arm(&mut self, source: &[AtomicU8]) {
            self.words = source.iter().map(|w| w.load(Ordering::Relaxed)).collect();
            self.arms += 1;
        }
    }

    fn config(standard: VideoStandard) -> VideoConfig {
        VideoConfig {
            standard,
            palette: Palette::Mono,
            mode: Mode::Narrow,
        }
    }

    /// Runs the sync handler at roughly line rate until dropped.
    struct Scanner {
        stop: Arc<AtomicBool>,
        handle: Option<thread::JoinHandle<()>>,
    }

    impl Scanner {
        fn start(engine: LineEngine) -> Self {
            let stop = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&stop);
            let handle = thread::spawn(move || {
                let mut sync = Latch::<u16>::default();
                let mut data = Latch::<u8>::default();
                while !flag.load(Ordering::Relaxed) {
                    if engine.on_sync_complete(&mut sync) == LineKind::Active {
                        engine.on_pixels_wanted(&mut data);
                    }
                    thread::yield_now();
                }
            });
            Self { stop, handle: Some(handle) }
        }
    }

    impl Drop for Scanner {
        fn drop(&mut self) {
            self.stop.store(true, Ordering::Relaxed);
            if let Some(h) = self.handle.take() {
                h.join().ok();
            }
        }
    }

    #[test]
    fn test_classifier_wraps_once_per_field() {
        for standard in [VideoStandard::Ntsc, VideoStandard::Pal] {
            let (video, engine) = Video::new(config(standard));
            let mut sync = Latch::<u16>::default();
            let total = standard.total_lines();

            let mut kinds = Vec::new();
            for _ in 0..total {
                kinds.push(engine.on_sync_complete(&mut sync));
            }
            assert_eq!(video.line_position().0, 1);
            assert_eq!(video.frame_count(), 1);
            assert!(video.parity());
            assert_eq!(sync.arms, total as usize);
            for (i, kind) in kinds.iter().enumerate() {
                assert_eq!(*kind, standard.classify(i as u16 + 1));
            }

            for _ in 0..total {
                engine.on_sync_complete(&mut sync);
            }
            assert_eq!(video.frame_count(), 2);
            assert!(!video.parity());
        }
    }

    #[test]
    fn test_classifier_arms_matching_table() {
        let (video, engine) = Video::new(config(VideoStandard::Pal));
        let mut sync = Latch::<u16>::default();
        engine.on_sync_complete(&mut sync);
        assert_eq!(sync.words, video.waveform(LineKind::LongSync).to_vec());
        engine.on_sync_complete(&mut sync);
        engine.on_sync_complete(&mut sync);
        assert_eq!(sync.words, video.waveform(LineKind::HalfLineSync).to_vec());
    }

    #[test]
    fn test_feeder_wraps_after_height_rows() {
        let (mut video, engine) = Video::new(config(VideoStandard::Pal));
        let height = video.height();
        {
            let canvas = video.canvas();
            canvas.draw_pixel(0, 0, 1);
            canvas.draw_pixel(0, 239, 2);
        }
        video.swap();

        let mut data = Latch::<u8>::default();
        for row in 0..height {
            assert_eq!(video.line_position().1, row);
            assert!(engine.on_pixels_wanted(&mut data));
            assert_eq!(data.words.len(), 256);
        }
        assert_eq!(video.line_position().1, 0);
        assert_eq!(data.words[0], 0x12);

        engine.on_pixels_wanted(&mut data);
        assert_eq!(data.words[0], 0x11);
    }

    #[test]
    fn test_field_wrap_relocks_feeder() {
        let (video, engine) = Video::new(config(VideoStandard::Ntsc));
        let mut sync = Latch::<u16>::default();
        let mut data = Latch::<u8>::default();
        for _ in 0..VideoStandard::Ntsc.total_lines() {
            if engine.on_sync_complete(&mut sync) == LineKind::Active {
                engine.on_pixels_wanted(&mut data);
            }
        }
        // 253 active lines on a 240-row buffer leave the feeder mid-picture
        // until the field wraps.
        assert_eq!(video.line_position(), (1, 0));
    }

    #[test]
    fn test_swap_exchanges_roles_without_copying() {
        let (mut video, _engine) = Video::new(config(VideoStandard::Pal));
        let front = video.front_ptr();
        let back = video.back_ptr();
        assert_ne!(front, back);

        video.canvas().draw_pixel(3, 4, 5);
        video.swap();
        assert_eq!(video.front_ptr(), back);
        assert_eq!(video.back_ptr(), front);
        assert_eq!(video.front_snapshot()[4 * 256 + 3], 0x15);

        video.swap();
        assert_eq!(video.front_ptr(), front);
        assert_eq!(video.back_ptr(), back);
    }

    #[test]
    fn test_border_colour() {
        let (video, _engine) = Video::new(config(VideoStandard::Pal));
        let before = video.waveform(LineKind::Border);
        assert!(before[6..].iter().all(|&c| c == 0x8010));

        video.set_border_colour(3).unwrap();
        let border = video.waveform(LineKind::Border);
        assert!(border[6..].iter().all(|&c| c == 0x8013));
        assert_eq!(video.waveform(LineKind::Active)[31], 0x8013);

        let err = video.set_border_colour(16).unwrap_err();
        assert!(matches!(err, VideoError::ColourOutOfRange { colour: 16, max: 15 }));
        assert_eq!(video.waveform(LineKind::Border), border);
    }

    #[test]
    fn test_draw_swap_clear_scenario() {
        let (mut video, engine) = Video::new(config(VideoStandard::Pal));
        let base = video.palette().colour_base();
        let scanner = Scanner::start(engine);

        video.set_border_colour(3).unwrap();
        video.wait_vblank();
        video.canvas().fill_rect(10, 10, 50, 50, 7);
        video.swap();
        video.canvas().clear(0);

        let front = video.front_snapshot();
        assert_eq!(front[30 * 256 + 30], base + 7);
        assert_eq!(front[0], base);
        assert!(video.back_snapshot().iter().all(|&p| p == base));
        drop(scanner);
    }

    #[test]
    fn test_set_mode_reallocates() {
        let (mut video, engine) = Video::new(config(VideoStandard::Pal));
        let scanner = Scanner::start(engine);

        video.set_mode(Mode::Wide);
        assert_eq!((video.width(), video.height()), (640, 240));
        assert_eq!(video.front_snapshot().len(), 640 * 240);
        assert_eq!(video.back_snapshot().len(), 640 * 240);
        let channel = video.data_channel();
        assert_eq!(channel.transfer_len, 640);
        assert_eq!(channel.clock_divider, Mode::Wide.pixel_divider(VideoStandard::Pal));
        drop(scanner);
    }

    #[test]
    fn test_feeder_skips_line_during_mode_change() {
        let (video, engine) = Video::new(config(VideoStandard::Pal));
        let mut data = Latch::<u8>::default();
        let guard = video.shared.screen.write().unwrap();
        assert!(!engine.on_pixels_wanted(&mut data));
        drop(guard);
        assert!(engine.on_pixels_wanted(&mut data));
        assert_eq!(data.arms, 1);
    }
}
