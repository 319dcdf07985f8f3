//! Completion tracking for the AXI DMAC.
//!
//! The transfer-done register carries one bit per hardware transfer ID. A bit
//! is set when its transfer finishes and stays set until the hardware hands
//! the same ID out again, so the register alone cannot say which completions
//! are new. The tracker keeps a scan cursor (`next_recv`) and only drains
//! slots that are in flight under exactly the ID whose bit is set. A
//! submission the hardware has not accepted yet still shows its ID's old
//! done bit, so that bit is masked while the submit bit is set.

use core::sync::atomic::{Ordering, compiler_fence};

use super::dmac::Dmac;
use super::error::{DmaError, DmaResult};
use super::interrupt::{InterruptLine, IrqStatus};
use crate::dma::TransferId;
use crate::fmt::{debug, info};
use crate::internal::constants::TRANSFER_ID_COUNT;
use crate::internal::register::RegisterAccess;
use crate::internal::register::dmac::{IRQ_ALL, IRQ_TRANSFER_QUEUED};

impl<R, L, const SLOTS: usize, const BUF_SIZE: usize> Dmac<'_, R, L, SLOTS, BUF_SIZE>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    // =========================================================================
    // Harvest
    // =========================================================================

    /// Drain completed transfers
    ///
    /// Takes one snapshot of the done register and scans every transfer ID
    /// once, starting at the ID after the last completion seen. Each slot in
    /// flight under a completed ID is passed to `consume` and released, in
    /// hardware order. When the read pipeline is active the freed slots are
    /// queued again with the pipeline's transfer size.
    ///
    /// Returns the number of completions drained.
    pub fn harvest<F>(&mut self, mut consume: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let done = self.settled_done_mask();
        // Buffer contents must not be read before the done snapshot
        compiler_fence(Ordering::Acquire);

        let mut drained = 0;
        let mut last = None;
        for offset in 0..TRANSFER_ID_COUNT {
            let id = self.next_recv.wrapping_add(offset);
            if !done.is_done(id) {
                continue;
            }

            let slot = self.pool.slot_mut(id);
            if slot.transfer_id() != Some(id) {
                // Stale bit, or a different ID now owns this slot
                continue;
            }
            consume(slot.data());
            slot.release();

            drained += 1;
            last = Some(id);
        }

        if let Some(last) = last {
            self.next_recv = last.next();
        }

        if let Some(bytes) = self.rx_pipeline {
            let queued = self.fill_read_transfers(bytes);
            if drained > 0 {
                debug!("harvested {} transfers, requeued {}", drained, queued);
            }
        }

        drained
    }

    /// ID at which the next harvest starts scanning
    #[inline(always)]
    pub fn next_recv_transfer(&self) -> TransferId {
        self.next_recv
    }

    // =========================================================================
    // Interrupt Handling
    // =========================================================================

    /// Unmask the transfer-completed interrupt
    ///
    /// Pending status is cleared first so an old event does not fire.
    pub fn enable_irq(&mut self) {
        self.regs.set_irq_status(IRQ_ALL);
        self.regs.set_irq_mask(IRQ_TRANSFER_QUEUED);
    }

    /// Mask every DMAC interrupt
    pub fn disable_irq(&mut self) {
        self.regs.set_irq_mask(IRQ_ALL);
    }

    /// Acknowledge a completion interrupt and run `f`
    ///
    /// If the completed status bit is set it is written back (write-1-to-clear)
    /// before `f` runs, so a completion arriving during `f` raises a new
    /// interrupt. Returns whether `f` ran.
    pub fn handle_irq<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self),
    {
        if !self.take_completed() {
            return false;
        }
        f(self);
        true
    }

    /// Full interrupt service routine
    ///
    /// Clears the completed status bit, harvests, then acknowledges the
    /// interrupt line. Returns the number harvested, or `None` when the
    /// interrupt was not a completion.
    ///
    /// # Example
    /// ```ignore
    /// #[interrupt]
    /// fn DMAC_RX() {
    ///     DMAC.with(|dmac| dmac.service_interrupt(|data| forward(data)));
    /// }
    /// ```
    pub fn service_interrupt<F>(&mut self, consume: F) -> Option<usize>
    where
        F: FnMut(&[u8]),
    {
        let harvested = if self.take_completed() {
            Some(self.harvest(consume))
        } else {
            None
        };
        self.irq.acknowledge();
        harvested
    }

    /// Install the platform interrupt handler
    pub fn register_interrupt_sink(&mut self, sink: L::Sink) {
        self.irq.register_sink(sink);
    }

    /// Signal end-of-interrupt on the interrupt line
    pub fn ack_interrupt(&mut self) {
        self.irq.acknowledge();
    }

    fn take_completed(&mut self) -> bool {
        if !self.irq_status().completed {
            return false;
        }
        self.regs.set_irq_status(IrqStatus::COMPLETED.to_raw());
        true
    }

    // =========================================================================
    // Pipeline Control
    // =========================================================================

    /// Start the self-refilling read pipeline
    ///
    /// Restarts the core (aborting every outstanding transfer), releases all
    /// slots, unmasks the completion interrupt and queues as many reads of
    /// `bytes` (0 = full capacity) as the hardware accepts. Every later
    /// harvest requeues reads of the same size. Returns the number queued.
    ///
    /// # Errors
    /// - `NotSupported` - Hardware cannot write into memory
    /// - `BufferExceeded` - `bytes` exceeds the slot capacity
    pub fn enable_rx(&mut self, bytes: usize) -> DmaResult<usize> {
        if !self.capabilities().read {
            return Err(DmaError::NotSupported);
        }
        let size = self.resolve_read_size(bytes)?;

        self.restart();
        self.rx_pipeline = Some(size);
        self.enable_irq();

        let queued = self.fill_read_transfers(size);
        info!("read pipeline started: {} x {} bytes", queued, size);
        Ok(queued)
    }

    /// Size of each read queued by the active pipeline
    #[inline(always)]
    pub fn rx_transfer_len(&self) -> Option<usize> {
        self.rx_pipeline
    }

    /// Abort all transfers and return every slot to software
    ///
    /// Stops the read pipeline. The core is left enabled.
    pub fn reset(&mut self) {
        self.restart();
        self.rx_pipeline = None;
    }

    fn restart(&mut self) {
        self.regs.disable();
        self.regs.enable();
        self.pool.release_all();
        self.next_recv = TransferId::FIRST;
        self.last_submitted = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
