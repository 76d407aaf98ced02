//! The hardware seam between the line handlers and the output state machines.
//!
//! On the target each channel is an RP2040 DMA channel whose read address is
//! written through the "trigger" alias, restarting the transfer into a PIO TX
//! FIFO. Completion interrupts call back into
//! [`LineEngine`](crate::video::LineEngine). The host build drives the same
//! handlers from [`crate::sim`].

use std::sync::atomic::{AtomicU16, AtomicU8};

/// A DMA channel that streams a buffer into one state machine.
pub trait DmaChannel {
    /// Unit of one bus transfer (16-bit sync codes or 8-bit pixels).
    type Word;

    /// Point the channel at `source` and start the transfer.
    ///
    /// Called from line-rate handlers: implementations must not block or
    /// allocate.
    fn arm(&mut self, source: &[Self::Word]);
}

/// Channel carrying 32 sync codes per line.
pub trait SyncChannel: DmaChannel<Word = AtomicU16> {}
impl<T: DmaChannel<Word = AtomicU16>> SyncChannel for T {}

/// Channel carrying one framebuffer row per line.
pub trait PixelChannel: DmaChannel<Word = AtomicU8> {}
impl<T: DmaChannel<Word = AtomicU8>> PixelChannel for T {}
