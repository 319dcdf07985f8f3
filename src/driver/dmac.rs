//! AXI DMAC Driver
//!
//! This module provides the [`Dmac`] driver: hardware probing at construction,
//! core control, and the transfer engine that queues buffers from a
//! [`DmaBufferPool`] to the hardware. Completion handling lives in
//! `completion.rs`.
//!
//! # Ownership Model
//!
//! A slot belongs to software while it is `Free` and to the hardware while it
//! is `InFlight`. Only two paths move a slot to `InFlight` (a write or read
//! submission) and only the completion path, a forced reclaim of an observed
//! done transfer, or a full reset moves it back.

use core::sync::atomic::{Ordering, compiler_fence};

use embedded_hal::delay::DelayNs;

use super::config::{Capabilities, DmacConfig, InterfaceInfo, Version};
use super::error::{ConfigError, ConfigResult, DmaError, DmaResult, IoError, IoResult, Result};
use super::interrupt::{InterruptLine, IrqStatus};
use crate::dma::{DmaBufferPool, DoneMask, TransferId};
use crate::fmt::{debug, error, info, trace, warning};
use crate::internal::constants::DMAC_MAGIC;
use crate::internal::register::RegisterAccess;
use crate::internal::register::dmac::{DmacRegs, FLAGS_CYCLIC, IRQ_ALL};

// =============================================================================
// Driver
// =============================================================================

/// AXI DMAC driver
///
/// Borrows its buffer pool for `'p` so the (large) pool can be a static in
/// DMA-capable memory while construction stays fallible.
///
/// # Type Parameters
/// * `R` - Register backend (usually [`Mmio`](crate::Mmio))
/// * `L` - Interrupt line for end-of-interrupt signalling
/// * `SLOTS` - Number of buffer slots
/// * `BUF_SIZE` - Size of each buffer in bytes
///
/// # Example
/// ```ignore
/// static mut POOL: DmaBufferPoolDefault = DmaBufferPool::new();
///
/// let regs = unsafe { Mmio::new(0x7C42_0000) };
/// let pool = unsafe { &mut *core::ptr::addr_of_mut!(POOL) };
/// let mut dmac = Dmac::new(regs, NoInterruptLine, pool, DmacConfig::tx())?;
///
/// dmac.enqueue_write(|buf| {
///     buf[..4].copy_from_slice(&[1, 2, 3, 4]);
///     4
/// }, false)?;
/// ```
pub struct Dmac<'p, R, L, const SLOTS: usize, const BUF_SIZE: usize>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    pub(super) regs: DmacRegs<R>,
    pub(super) irq: L,
    pub(super) pool: &'p mut DmaBufferPool<SLOTS, BUF_SIZE>,
    pub(super) config: DmacConfig,
    version: Version,
    peripheral_id: u32,
    caps: Capabilities,
    /// Hardware ID at which the next completion scan starts
    pub(super) next_recv: TransferId,
    /// Transfer size of the self-refilling read pipeline, when active
    pub(super) rx_pipeline: Option<usize>,
    /// Most recently submitted ID; its done bit is stale until hardware accepts it
    pub(super) last_submitted: Option<TransferId>,
}

impl<'p, R, L, const SLOTS: usize, const BUF_SIZE: usize> Dmac<'p, R, L, SLOTS, BUF_SIZE>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    // =========================================================================
    // Initialization
    // =========================================================================

    /// Probe the hardware and create a driver
    ///
    /// This performs the initialization sequence:
    /// 1. Check the identification register
    /// 2. Read version and peripheral ID
    /// 3. Discover read/write capabilities (interface register, 4.4+)
    /// 4. Size the buffer pool and release every slot
    /// 5. Clear cyclic mode and enable the core
    ///
    /// # Errors
    /// - `IdentificationFailed` - Register window does not hold a DMAC
    /// - `ReadNotSupported` / `WriteNotSupported` - A required direction is missing
    /// - `InvalidConfig` - `max_transfer_len` leaves no usable capacity
    pub fn new(
        bus: R,
        irq: L,
        pool: &'p mut DmaBufferPool<SLOTS, BUF_SIZE>,
        config: DmacConfig,
    ) -> ConfigResult<Self> {
        let mut regs = DmacRegs::new(bus);

        let ident = regs.identification();
        if ident != DMAC_MAGIC {
            error!("DMAC identification failed: {:#x}", ident);
            return Err(ConfigError::IdentificationFailed);
        }

        let version = Version::from_raw(regs.version());
        let peripheral_id = regs.peripheral_id();
        info!(
            "AXI DMAC {}.{}.{} (peripheral id {})",
            version.major,
            version.minor,
            version.patch,
            peripheral_id
        );

        let caps = if version.has_interface_register() {
            let info = InterfaceInfo::from_raw(regs.interface());
            debug!(
                "DMAC interface: dst {:?} ({}), src {:?} ({})",
                info.dst_type,
                info.dst_bytes_per_beat_log2,
                info.src_type,
                info.src_bytes_per_beat_log2
            );
            info.capabilities()
        } else {
            warning!(
                "DMAC {}.{} has no interface register, assuming read and write support",
                version.major,
                version.minor
            );
            Capabilities::BOTH
        };

        if config.require_read && !caps.read {
            error!("DMAC cannot transfer into memory");
            return Err(ConfigError::ReadNotSupported);
        }
        if config.require_write && !caps.write {
            error!("DMAC cannot transfer out of memory");
            return Err(ConfigError::WriteNotSupported);
        }

        if pool.init(config.max_transfer_len) == 0 {
            error!("DMAC buffer capacity is zero");
            return Err(ConfigError::InvalidConfig);
        }

        let flags = regs.flags();
        regs.set_flags(flags & !FLAGS_CYCLIC);
        regs.enable();

        Ok(Self {
            regs,
            irq,
            pool,
            config,
            version,
            peripheral_id,
            caps,
            next_recv: TransferId::FIRST,
            rx_pipeline: None,
            last_submitted: None,
        })
    }

    /// Core version
    #[inline(always)]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Raw peripheral ID register value
    #[inline(always)]
    pub fn peripheral_id(&self) -> u32 {
        self.peripheral_id
    }

    /// Supported transfer directions
    #[inline(always)]
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Active configuration
    #[inline(always)]
    pub fn config(&self) -> &DmacConfig {
        &self.config
    }

    /// Usable bytes per transfer
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of slots currently owned by hardware
    pub fn in_flight(&self) -> usize {
        self.pool.in_flight()
    }

    /// Buffer pool, for inspection
    #[inline(always)]
    pub fn pool(&self) -> &DmaBufferPool<SLOTS, BUF_SIZE> {
        self.pool
    }

    // =========================================================================
    // Core Control
    // =========================================================================

    /// Enable the DMA core
    pub fn enable(&mut self) {
        self.regs.enable();
    }

    /// Disable the DMA core
    ///
    /// This aborts all outstanding transfers without touching the buffer
    /// pool; follow with [`reset`](Self::reset) or
    /// [`enable_rx`](Self::enable_rx) before submitting again.
    pub fn disable(&mut self) {
        self.regs.disable();
    }

    /// Pause the DMA core
    pub fn pause(&mut self) {
        self.regs.pause();
    }

    /// Resume a paused DMA core
    pub fn resume(&mut self) {
        self.regs.resume();
    }

    /// Check whether the DMA core is enabled
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.regs.is_enabled()
    }

    /// Check whether the DMA core is paused
    #[inline(always)]
    pub fn is_paused(&self) -> bool {
        self.regs.is_paused()
    }

    /// Bytes moved so far by the active transfer
    #[inline(always)]
    pub fn transfer_progress(&self) -> u32 {
        self.regs.transfer_progress()
    }

    /// Current interrupt status flags
    #[inline(always)]
    pub fn irq_status(&self) -> IrqStatus {
        IrqStatus::from_raw(self.regs.irq_status())
    }

    /// Snapshot of the transfer-done register
    #[inline(always)]
    pub fn done_mask(&self) -> DoneMask {
        DoneMask::from_raw(self.regs.transfer_done())
    }

    // =========================================================================
    // Transfer Engine
    // =========================================================================

    /// Queue an outbound (memory to peripheral) transfer
    ///
    /// `fill` receives the whole usable buffer of the next slot and returns
    /// how many bytes it produced. With `blocking` set the call spins until
    /// the hardware has accepted the queuing operation (not until the
    /// transfer completes).
    ///
    /// # Errors
    /// - `NotSupported` - Hardware cannot read from memory
    /// - `QueueFull` - Previous submission not yet accepted, or slot still in flight
    /// - `DeviceError` - Hardware reported an invalid next transfer ID
    /// - `BufferExceeded` - `fill` returned more than the slot capacity
    /// - `InvalidLength` - `fill` produced no data
    pub fn enqueue_write<F>(&mut self, fill: F, blocking: bool) -> DmaResult<TransferId>
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        if !self.caps.write {
            return Err(DmaError::NotSupported);
        }
        if self.regs.submit_pending() {
            return Err(DmaError::QueueFull);
        }

        let id = self.next_transfer_id()?;
        self.reclaim(id)?;

        let slot = self.pool.slot_mut(id);
        let size = fill(slot.writable());
        if size > slot.capacity() {
            return Err(DmaError::BufferExceeded);
        }
        if size == 0 {
            return Err(DmaError::InvalidLength);
        }
        slot.submit(id, size);
        let addr = slot.device_address(self.config.bus_offset);
        self.last_submitted = Some(id);

        self.regs.set_length_bytes(size);
        self.regs.set_src_address(addr);
        // Buffer contents and slot state must be visible before the device sees the submit
        compiler_fence(Ordering::Release);
        self.regs.queue_transfer();
        trace!("write transfer {} queued ({} bytes)", id, size);

        if blocking {
            while self.regs.submit_pending() {
                core::hint::spin_loop();
            }
        }

        Ok(id)
    }

    /// Queue a single inbound transfer and wait for it to complete
    ///
    /// `bytes` of zero means the full slot capacity. Polls the done bit of
    /// the submitted transfer every `poll_interval_us`, for at most
    /// `read_timeout_us`, then hands the received data to `consume` and
    /// releases the slot. Returns the transfer size.
    ///
    /// Do not mix with an active read pipeline ([`enable_rx`](Self::enable_rx)):
    /// a harvest would consume this transfer instead.
    ///
    /// # Errors
    /// - `NotSupported` - Hardware cannot write into memory
    /// - `QueueFull` - Previous submission not yet accepted, or slot still in flight
    /// - `BufferExceeded` - `bytes` exceeds the slot capacity
    /// - `DeviceError` - Hardware reported an invalid next transfer ID
    /// - `Timeout` - Transfer did not complete in time; its slot stays in flight
    pub fn enqueue_read<F, D>(&mut self, bytes: usize, consume: F, delay: &mut D) -> Result<usize>
    where
        F: FnOnce(&[u8]),
        D: DelayNs,
    {
        if !self.caps.read {
            return Err(DmaError::NotSupported.into());
        }
        if self.regs.submit_pending() {
            return Err(DmaError::QueueFull.into());
        }

        let id = self.submit_read(bytes)?;
        self.wait_done(id, delay)?;
        compiler_fence(Ordering::Acquire);

        let slot = self.pool.slot_mut(id);
        let size = slot.size();
        consume(slot.data());
        slot.release();
        Ok(size)
    }

    /// Program and queue one inbound transfer into the slot of the next ID
    pub(super) fn submit_read(&mut self, bytes: usize) -> DmaResult<TransferId> {
        let size = self.resolve_read_size(bytes)?;
        let id = self.next_transfer_id()?;

        let slot = self.pool.slot_mut(id);
        if slot.is_used() {
            return Err(DmaError::QueueFull);
        }
        slot.submit(id, size);
        let addr = slot.device_address(self.config.bus_offset);
        self.last_submitted = Some(id);

        self.regs.set_length_bytes(size);
        self.regs.set_dest_address(addr);
        compiler_fence(Ordering::Release);
        self.regs.queue_transfer();
        trace!("read transfer {} queued ({} bytes)", id, size);

        Ok(id)
    }

    /// Queue inbound transfers until the hardware stops accepting them
    ///
    /// Returns how many transfers were queued. Failures end the loop and
    /// are logged, never returned.
    pub(super) fn fill_read_transfers(&mut self, bytes: usize) -> usize {
        let mut queued = 0;
        while !self.regs.submit_pending() {
            match self.submit_read(bytes) {
                Ok(_) => queued += 1,
                Err(DmaError::QueueFull) => break,
                Err(e) => {
                    warning!("read refill stopped: {:?}", e);
                    break;
                }
            }
        }
        queued
    }

    /// Map a requested read size (0 = capacity) to a checked transfer size
    pub(super) fn resolve_read_size(&self, bytes: usize) -> DmaResult<usize> {
        let capacity = self.pool.capacity();
        match bytes {
            0 => Ok(capacity),
            n if n > capacity => Err(DmaError::BufferExceeded),
            n => Ok(n),
        }
    }

    fn next_transfer_id(&self) -> DmaResult<TransferId> {
        let raw = self.regs.next_transfer_id();
        TransferId::new(raw).ok_or_else(|| {
            error!("DMAC reported invalid next transfer id {}", raw);
            DmaError::DeviceError
        })
    }

    /// ID whose submission hardware has not accepted yet
    ///
    /// Must be read before the done register: once the submit bit reads
    /// clear, a later done snapshot no longer carries that ID's stale bit.
    fn pending_submission(&self) -> Option<TransferId> {
        if self.regs.submit_pending() {
            self.last_submitted
        } else {
            None
        }
    }

    /// Done snapshot with the bit of a not yet accepted submission masked out
    pub(super) fn settled_done_mask(&self) -> DoneMask {
        let pending = self.pending_submission();
        let done = self.done_mask();
        match pending {
            Some(id) => done.without(id),
            None => done,
        }
    }

    /// Take back the slot for `id` if the transfer it still holds is done
    fn reclaim(&mut self, id: TransferId) -> DmaResult<()> {
        let Some(previous) = self.pool.slot(id).transfer_id() else {
            return Ok(());
        };
        if !self.settled_done_mask().is_done(previous) {
            return Err(DmaError::QueueFull);
        }
        self.pool.slot_mut(id).release();
        Ok(())
    }

    fn wait_done<D: DelayNs>(&self, id: TransferId, delay: &mut D) -> IoResult<()> {
        let poll_us = self.config.poll_interval_us.max(1);
        let max_iterations = (self.config.read_timeout_us / poll_us).max(1);
        for _ in 0..max_iterations {
            if self.settled_done_mask().is_done(id) {
                return Ok(());
            }
            delay.delay_us(poll_us);
        }
        if self.settled_done_mask().is_done(id) {
            return Ok(());
        }

        warning!("read transfer {} timed out", id);
        Err(IoError::Timeout)
    }
}

impl<R, L, const SLOTS: usize, const BUF_SIZE: usize> Drop for Dmac<'_, R, L, SLOTS, BUF_SIZE>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    fn drop(&mut self) {
        self.regs.set_irq_mask(IRQ_ALL);
        self.regs.disable();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
