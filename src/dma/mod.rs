//! DMA buffer management
//!
//! The AXI DMAC has no descriptor rings. Each queued transfer is identified by
//! a hardware-assigned ID, and completion is reported as one bit per ID in
//! the transfer-done register. This module holds the software side of that
//! arrangement:
//!
//! - [`DmaBufferPool`]: statically allocated buffers, one slot per ID
//!   (modulo pool size), each tracking whether hardware owns it
//! - [`TransferId`] / [`DoneMask`]: the ID space and done-register snapshots
//!
//! # Memory Layout
//!
//! Every slot is page aligned, so a transfer never crosses a 4 KiB boundary
//! as long as its length stays at or below `MAX_TRANSFER_LEN`. The pool must
//! be placed in DMA-capable memory that the device sees uncached (or that is
//! otherwise coherent with the CPU).

mod done;
mod pool;

pub use done::{DoneMask, TransferId};
pub use pool::{DmaBuffer, DmaBufferPool, SlotState};
