use bytemuck::{Pod, Zeroable};

/// Bit 15 of a sync code: substitute the current border colour (low byte).
pub const BORDER_FLAG: u16 = 0x8000;

/// One decoded RGBA8 pixel, laid out for direct upload to textures and PNGs.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

/// Sync levels driven on the output pins while not scanning pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncLevels {
    /// Horizontal sync tip.
    pub hslo: u16,
    /// Horizontal blanking (back porch).
    pub hshi: u16,
    /// Vertical sync tip.
    pub vslo: u16,
    /// Vertical blanking.
    pub vshi: u16,
}

/// Pixel encoding of the output DAC, chosen at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// 16 grey levels on a 5-bit resistor ladder; index 0 is darkest.
    Mono,
    /// Packed RGB332 driven to an external colour encoder.
    Colour,
}

/// Grey ramp for [`Palette::Mono`], indexed by palette colour.
const MONO_LEVELS: [Rgba; 16] = {
    let mut p = [Rgba::BLACK; 16];
    let mut i = 0;
    while i < 16 {
        let v = (i * 17) as u8;
        p[i] = Rgba::opaque(v, v, v);
        i += 1;
    }
    p
};

/// Pack 3-bit red, 3-bit green and the top two bits of a 3-bit blue.
pub const fn rgb(r: u8, g: u8, b: u8) -> u8 {
    ((b & 6) << 5) | ((g & 7) << 3) | (r & 7)
}

impl Palette {
    /// The palette selected by the `colour` cargo feature.
    pub const BUILD: Palette = if cfg!(feature = "colour") {
        Palette::Colour
    } else {
        Palette::Mono
    };

    /// Offset added to every colour before it reaches the pins.
    pub const fn colour_base(self) -> u8 {
        match self {
            Palette::Mono => 0x10,
            Palette::Colour => 0x00,
        }
    }

    /// Largest colour index accepted by drawing and border calls.
    pub const fn colour_max(self) -> u8 {
        match self {
            Palette::Mono => 0x0F,
            Palette::Colour => 0xFF,
        }
    }

    pub const fn sync_levels(self) -> SyncLevels {
        match self {
            Palette::Mono => SyncLevels {
                hslo: 0x0001,
                hshi: 0x000D,
                vslo: 0x0001,
                vshi: 0x000D,
            },
            Palette::Colour => SyncLevels {
                hslo: 0x4200,
                hshi: 0x4000,
                vslo: 0x4100,
                vshi: 0x4000,
            },
        }
    }

    /// Stored byte for colour index `c`, or `None` when `c` is out of range.
    pub fn encode(self, c: u8) -> Option<u8> {
        (c <= self.colour_max()).then(|| self.colour_base().wrapping_add(c))
    }

    /// Sync-table code carrying border colour `c`.
    pub fn border_code(self, c: u8) -> Option<u16> {
        self.encode(c).map(|code| BORDER_FLAG | code as u16)
    }

    /// What a monitor shows for a byte clocked out of the data channel.
    ///
    /// Mono levels below `colour_base` sit at or below blanking and decode as black.
    pub fn to_rgba(self, code: u8) -> Rgba {
        match self {
            Palette::Mono => match code.checked_sub(self.colour_base()) {
                Some(level) if level <= self.colour_max() => MONO_LEVELS[level as usize],
                _ => Rgba::BLACK,
            },
            Palette::Colour => rgb332_to_rgba(code),
        }
    }
}

/// Expand an RGB332 byte (R in bits 2:0, G in 5:3, B in 7:6) to RGBA8.
pub fn rgb332_to_rgba(code: u8) -> Rgba {
    let r = code & 0x07;
    let g = (code >> 3) & 0x07;
    let b = code >> 6;
    Rgba::opaque(
        (r << 5) | (r << 2) | (r >> 1),
        (g << 5) | (g << 2) | (g >> 1),
        b * 0x55,
    )
}
