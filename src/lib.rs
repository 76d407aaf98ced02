//! Composite video generation from a double-buffered 8-bit framebuffer.
//!
//! [`video`] owns the line timing, the waveform tables and the buffer pair.
//! Its [`LineEngine`](video::LineEngine) half is driven once per scanline by
//! the output hardware, through the [`dma`] seam, or on a host by
//! [`sim::ScanOut`]. [`gfx`] draws into the back buffer.

pub mod dma;
pub mod gfx;
pub mod scene;
pub mod screenshot;
pub mod sim;
pub mod video;
