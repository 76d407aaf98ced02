use std::sync::atomic::{AtomicU16, Ordering};

use super::palette::{Palette, BORDER_FLAG};
use super::standard::{LineKind, VideoStandard};

/// Sync codes clocked out per scanline.
pub const TABLE_LEN: usize = 32;

/// First slot that may carry the border colour; earlier slots are sync.
pub const BORDER_START: usize = 6;

/// One scanline of sync codes, readable by the DMA while being recoloured.
pub type WaveformTable = [AtomicU16; TABLE_LEN];

fn table(codes: [u16; TABLE_LEN]) -> WaveformTable {
    codes.map(AtomicU16::new)
}

/// The five waveform tables the classifier chooses between.
#[derive(Debug)]
pub struct Waveforms {
    long_sync: WaveformTable,
    short_sync: WaveformTable,
    half_line_sync: WaveformTable,
    border: WaveformTable,
    active: WaveformTable,
}

impl Waveforms {
    /// Build the tables for `standard`, with a border flag but no colour yet.
    pub fn new(standard: VideoStandard, palette: Palette) -> Self {
        let s = palette.sync_levels();

        let mut active = [0u16; TABLE_LEN];
        active[..2].fill(s.hslo);
        active[2..standard.hsync_slots()].fill(s.hshi);
        active[TABLE_LEN - 1] = BORDER_FLAG;

        let mut border = [BORDER_FLAG; TABLE_LEN];
        border[..2].fill(s.hslo);
        border[2..BORDER_START].fill(s.hshi);

        // Two half-line pulses per table.
        let mut long_sync = [s.vslo; TABLE_LEN];
        long_sync[15] = s.vshi;
        long_sync[31] = s.vshi;

        let mut short_sync = [s.vshi; TABLE_LEN];
        short_sync[0] = s.vslo;
        short_sync[16] = s.vslo;

        let mut half_line_sync = long_sync;
        half_line_sync[17..].fill(s.vshi);

        Self {
            long_sync: table(long_sync),
            short_sync: table(short_sync),
            half_line_sync: table(half_line_sync),
            border: table(border),
            active: table(active),
        }
    }

    #[inline]
    pub fn get(&self, kind: LineKind) -> &WaveformTable {
        match kind {
            LineKind::LongSync => &self.long_sync,
            LineKind::ShortSync => &self.short_sync,
            LineKind::HalfLineSync => &self.half_line_sync,
            LineKind::Border => &self.border,
            LineKind::Active => &self.active,
        }
    }

    /// Write `code` into every border slot. Sync slots are never touched.
    ///
    /// Each slot is a single atomic store, so a concurrent reader sees either
    /// the old or the new colour per slot, never a torn value.
    pub fn set_border(&self, code: u16) {
        let code = code | BORDER_FLAG;
        for i in BORDER_START..TABLE_LEN {
            if self.active[i].load(Ordering::Relaxed) & BORDER_FLAG != 0 {
                self.active[i].store(code, Ordering::Relaxed);
            }
            self.border[i].store(code, Ordering::Relaxed);
        }
    }

    /// Copy of one table's current codes.
    pub fn snapshot(&self, kind: LineKind) -> [u16; TABLE_LEN] {
        let t = self.get(kind);
        std::array::from_fn(|i| t[i].load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pal_mono_tables() {
        let w = Waveforms::new(VideoStandard::Pal, Palette::Mono);
        let active = w.snapshot(LineKind::Active);
        assert_eq!(&active[..6], &[0x01, 0x01, 0x0D, 0x0D, 0x0D, 0x00]);
        assert!(active[5..31].iter().all(|&c| c == 0));
        assert_eq!(active[31], BORDER_FLAG);

        let border = w.snapshot(LineKind::Border);
        assert_eq!(&border[..6], &[0x01, 0x01, 0x0D, 0x0D, 0x0D, 0x0D]);
        assert!(border[6..].iter().all(|&c| c == BORDER_FLAG));
    }

    #[test]
    fn test_ntsc_active_line_has_shorter_sync() {
        let w = Waveforms::new(VideoStandard::Ntsc, Palette::Mono);
        let active = w.snapshot(LineKind::Active);
        assert_eq!(&active[..5], &[0x01, 0x01, 0x0D, 0x0D, 0x00]);
    }

    #[test]
    fn test_vsync_tables() {
        let w = Waveforms::new(VideoStandard::Pal, Palette::Colour);
        let (lo, hi) = (0x4100, 0x4000);

        let long = w.snapshot(LineKind::LongSync);
        assert_eq!(long.iter().filter(|&&c| c == hi).count(), 2);
        assert_eq!((long[15], long[31]), (hi, hi));

        let short = w.snapshot(LineKind::ShortSync);
        assert_eq!(short.iter().filter(|&&c| c == lo).count(), 2);
        assert_eq!((short[0], short[16]), (lo, lo));

        let half = w.snapshot(LineKind::HalfLineSync);
        assert_eq!(&half[..16], &long[..16]);
        assert_eq!(&half[16..], &short[16..]);
    }

    #[test]
    fn test_set_border_only_rewrites_border_slots() {
        let w = Waveforms::new(VideoStandard::Pal, Palette::Mono);
        let before_active = w.snapshot(LineKind::Active);
        let before_long = w.snapshot(LineKind::LongSync);

        w.set_border(0x8013);

        let active = w.snapshot(LineKind::Active);
        assert_eq!(&active[..31], &before_active[..31]);
        assert_eq!(active[31], 0x8013);

        let border = w.snapshot(LineKind::Border);
        assert_eq!(&border[..BORDER_START], &[0x01, 0x01, 0x0D, 0x0D, 0x0D, 0x0D]);
        assert!(border[BORDER_START..].iter().all(|&c| c == 0x8013));

        assert_eq!(w.snapshot(LineKind::LongSync), before_long);
    }
}
