use std::fmt;

use super::VideoError;

/// System clock the PIO dividers are computed against.
pub const SYSCLK_HZ: u32 = 250_000_000;

/// Framebuffer rows in every mode.
pub const SCREEN_HEIGHT: usize = 240;

/// Waveform category selected for one scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Broad vertical sync pulses.
    LongSync,
    /// Equalising pulses.
    ShortSync,
    /// Broad pulse then equalising pulse (the PAL half line).
    HalfLineSync,
    /// Sync followed by border colour for the whole line.
    Border,
    /// Sync, border lead-in, then the active pixel window.
    Active,
}

impl LineKind {
    /// Whether the line carries picture or border rather than vertical sync.
    pub fn is_visible(self) -> bool {
        matches!(self, LineKind::Border | LineKind::Active)
    }
}

/// Line layout and timing of the composite signal, chosen at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStandard {
    /// 262-line progressive field without a half line.
    Ntsc,
    /// 258-line progressive field with a half-line vsync.
    Pal,
}

/// Inclusive `(first, last, kind)` ranges, matched first to last.
type LineRanges = &'static [(u16, u16, LineKind)];

const NTSC_RANGES: LineRanges = &[
    (1, 6, LineKind::LongSync),
    (7, 9, LineKind::ShortSync),
    (0, 0, LineKind::Border),
    // Empty: no bottom border on this layout.
    (270, 262, LineKind::Border),
];

const PAL_RANGES: LineRanges = &[
    (1, 2, LineKind::LongSync),
    (3, 3, LineKind::HalfLineSync),
    (4, 5, LineKind::ShortSync),
    (310, 312, LineKind::ShortSync),
    (6, 18, LineKind::Border),
    (307, 309, LineKind::Border),
];

impl VideoStandard {
    /// The standard selected by the `ntsc` cargo feature.
    pub const BUILD: VideoStandard = if cfg!(feature = "ntsc") {
        VideoStandard::Ntsc
    } else {
        VideoStandard::Pal
    };

    /// Scanlines per field; `vline` runs over `1..=total_lines()`.
    pub const fn total_lines(self) -> u16 {
        match self {
            VideoStandard::Ntsc => 262,
            VideoStandard::Pal => 258,
        }
    }

    /// Nominal scanline period in nanoseconds.
    pub const fn line_period_ns(self) -> u64 {
        match self {
            VideoStandard::Ntsc => 63_556,
            VideoStandard::Pal => 64_000,
        }
    }

    /// Number of sync-level slots at the start of the active-line table.
    pub const fn hsync_slots(self) -> usize {
        match self {
            VideoStandard::Ntsc => 4,
            VideoStandard::Pal => 5,
        }
    }

    pub fn line_ranges(self) -> LineRanges {
        match self {
            VideoStandard::Ntsc => NTSC_RANGES,
            VideoStandard::Pal => PAL_RANGES,
        }
    }

    /// Category of `line`; lines matched by no range are [`LineKind::Active`].
    pub fn classify(self, line: u16) -> LineKind {
        self.line_ranges()
            .iter()
            .find(|&&(first, last, _)| (first..=last).contains(&line))
            .map_or(LineKind::Active, |&(_, _, kind)| kind)
    }

    /// Clock divider of the sync state machine.
    pub const fn sync_divider(self) -> ClockDivider {
        match self {
            VideoStandard::Ntsc => ClockDivider::from_centi(1040),
            VideoStandard::Pal => ClockDivider::from_centi(1046),
        }
    }

    /// Colour subcarrier frequency fed to the external encoder.
    pub const fn subcarrier_hz(self) -> u32 {
        match self {
            VideoStandard::Ntsc => 3_579_545,
            VideoStandard::Pal => 4_433_618,
        }
    }

    /// Divider for a square-wave subcarrier clock (two PIO cycles per period).
    pub const fn subcarrier_divider(self) -> ClockDivider {
        ClockDivider::from_ratio(SYSCLK_HZ as u64, 2 * self.subcarrier_hz() as u64)
    }
}

/// Horizontal resolution of the framebuffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// 256 pixels wide.
    #[default]
    Narrow,
    /// 320 pixels wide.
    Medium,
    /// 640 pixels wide.
    Wide,
}

impl TryFrom<u8> for Mode {
    type Error = VideoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Narrow),
            1 => Ok(Mode::Medium),
            2 => Ok(Mode::Wide),
            other => Err(VideoError::InvalidMode(other)),
        }
    }
}

impl Mode {
    pub const fn width(self) -> usize {
        match self {
            Mode::Narrow => 256,
            Mode::Medium => 320,
            Mode::Wide => 640,
        }
    }

    pub const fn height(self) -> usize {
        SCREEN_HEIGHT
    }

    /// Pixel clock divider of the data state machine for this mode.
    pub const fn pixel_divider(self, standard: VideoStandard) -> ClockDivider {
        let centi = match (standard, self) {
            (VideoStandard::Pal, Mode::Narrow) => 1200,
            (VideoStandard::Pal, Mode::Medium) => 1340,
            (VideoStandard::Pal, Mode::Wide) => 560,
            (VideoStandard::Ntsc, Mode::Narrow) => 1260,
            (VideoStandard::Ntsc, Mode::Medium) => 1008,
            (VideoStandard::Ntsc, Mode::Wide) => 504,
        };
        ClockDivider::from_centi(centi)
    }
}

/// PIO clock divider in 16.16 fixed point, as written to `SMx_CLKDIV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockDivider(pub u32);

impl ClockDivider {
    /// Divider of `centi / 100`, truncated to 16.16.
    pub const fn from_centi(centi: u32) -> Self {
        Self::from_ratio(centi as u64, 100)
    }

    pub const fn from_ratio(num: u64, den: u64) -> Self {
        ClockDivider(((num << 16) / den) as u32)
    }

    pub const fn integer(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn fraction(self) -> u16 {
        self.0 as u16
    }
}

impl fmt::Display for ClockDivider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0 as f64 / 65536.0)
    }
}

/// Per-line lookup of [`LineKind`], built once from the ordered ranges.
#[derive(Debug, Clone)]
pub struct LineMap {
    kinds: Box<[LineKind]>,
}

impl LineMap {
    pub fn new(standard: VideoStandard) -> Self {
        let kinds = (0..=standard.total_lines())
            .map(|line| standard.classify(line))
            .collect();
        Self { kinds }
    }

    /// Category of `line`. Lines past the field are treated as active.
    #[inline]
    pub fn get(&self, line: u16) -> LineKind {
        self.kinds
            .get(line as usize)
            .copied()
            .unwrap_or(LineKind::Active)
    }

    /// Number of lines of `kind` in `1..=total`.
    pub fn count(&self, kind: LineKind) -> usize {
        self.kinds[1..].iter().filter(|&&k| k == kind).count()
    }
}
