//! Fixed pool of DMA buffer slots indexed by hardware transfer ID.

use super::done::TransferId;
use crate::fmt::warning;
use crate::internal::constants::MAX_TRANSFER_LEN;

/// Ownership state of a buffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotState {
    /// Owned by software
    #[default]
    Free,
    /// Owned by hardware as the transfer with this ID
    InFlight(TransferId),
}

/// One DMA buffer slot
///
/// Page aligned so that a transfer of at most `MAX_TRANSFER_LEN` bytes
/// starting at the buffer never crosses a 4 KiB boundary.
#[repr(C, align(4096))]
pub struct DmaBuffer<const BUF_SIZE: usize> {
    data: [u8; BUF_SIZE],
    capacity: usize,
    size: usize,
    state: SlotState,
}

impl<const BUF_SIZE: usize> DmaBuffer<BUF_SIZE> {
    const fn new() -> Self {
        Self {
            data: [0u8; BUF_SIZE],
            capacity: clamp_capacity(BUF_SIZE, BUF_SIZE),
            size: 0,
            state: SlotState::Free,
        }
    }

    /// Usable bytes per transfer
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes used by the current or last transfer
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current ownership state
    #[inline(always)]
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Whether hardware currently owns this slot
    #[inline(always)]
    pub fn is_used(&self) -> bool {
        matches!(self.state, SlotState::InFlight(_))
    }

    /// Transfer ID the slot is in flight under, if any
    #[inline(always)]
    pub fn transfer_id(&self) -> Option<TransferId> {
        match self.state {
            SlotState::InFlight(id) => Some(id),
            SlotState::Free => None,
        }
    }

    /// Payload of the current or last transfer
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Host-visible start of the buffer
    #[inline(always)]
    pub fn host_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Device-visible start of the buffer
    #[inline]
    pub fn device_address(&self, bus_offset: u32) -> u32 {
        (self.data.as_ptr() as usize as u32).wrapping_add(bus_offset)
    }

    /// Whole usable buffer, for filling before submission
    #[inline]
    pub(crate) fn writable(&mut self) -> &mut [u8] {
        &mut self.data[..self.capacity]
    }

    /// Hand the slot to hardware as transfer `id` carrying `size` bytes
    #[inline]
    pub(crate) fn submit(&mut self, id: TransferId, size: usize) {
        debug_assert!(!self.is_used());
        debug_assert!(size <= self.capacity);
        self.size = size;
        self.state = SlotState::InFlight(id);
    }

    /// Return the slot to software
    #[inline(always)]
    pub(crate) fn release(&mut self) {
        self.state = SlotState::Free;
    }
}

const fn clamp_capacity(requested: usize, buf_size: usize) -> usize {
    let mut capacity = requested;
    if capacity > buf_size {
        capacity = buf_size;
    }
    if capacity > MAX_TRANSFER_LEN {
        capacity = MAX_TRANSFER_LEN;
    }
    capacity
}

/// Pool of `SLOTS` buffers of `BUF_SIZE` bytes each
///
/// Hardware transfer IDs map onto slots modulo `SLOTS`, so a pool smaller
/// than the 31-entry ID space trades concurrency for memory.
///
/// # Example
/// ```ignore
/// #[unsafe(link_section = ".uncached")]
/// static mut POOL: DmaBufferPool<31, 0xF00> = DmaBufferPool::new();
/// ```
pub struct DmaBufferPool<const SLOTS: usize, const BUF_SIZE: usize> {
    buffers: [DmaBuffer<BUF_SIZE>; SLOTS],
    capacity: usize,
}

impl<const SLOTS: usize, const BUF_SIZE: usize> DmaBufferPool<SLOTS, BUF_SIZE> {
    /// Create a pool with all slots free. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        const { assert!(SLOTS > 0, "a DMA buffer pool needs at least one slot") };
        Self {
            buffers: [const { DmaBuffer::new() }; SLOTS],
            capacity: clamp_capacity(BUF_SIZE, BUF_SIZE),
        }
    }

    /// Set the per-slot capacity and release every slot.
    ///
    /// The capacity is `max_transfer_len` clamped to `BUF_SIZE` and to
    /// `MAX_TRANSFER_LEN`. Returns the resulting capacity.
    pub fn init(&mut self, max_transfer_len: usize) -> usize {
        if max_transfer_len > MAX_TRANSFER_LEN {
            warning!(
                "limiting DMA buffer size to {} bytes, {} likely exceeds the 4 KiB boundary",
                MAX_TRANSFER_LEN,
                max_transfer_len
            );
        } else if max_transfer_len > BUF_SIZE {
            warning!(
                "limiting DMA buffer size to the {} byte pool buffers ({} requested)",
                BUF_SIZE,
                max_transfer_len
            );
        }

        self.capacity = clamp_capacity(max_transfer_len, BUF_SIZE);
        for buffer in &mut self.buffers {
            buffer.capacity = self.capacity;
            buffer.size = 0;
            buffer.state = SlotState::Free;
        }
        self.capacity
    }

    /// Number of slots
    #[inline(always)]
    pub const fn len(&self) -> usize {
        SLOTS
    }

    /// Always false; a pool has at least one slot
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Usable bytes per slot
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slot index backing transfer `id`
    #[inline(always)]
    pub const fn index_of(id: TransferId) -> usize {
        id.index() % SLOTS
    }

    /// Slot backing transfer `id`
    #[inline]
    pub fn slot(&self, id: TransferId) -> &DmaBuffer<BUF_SIZE> {
        &self.buffers[Self::index_of(id)]
    }

    /// Mutable slot backing transfer `id`
    #[inline]
    pub fn slot_mut(&mut self, id: TransferId) -> &mut DmaBuffer<BUF_SIZE> {
        &mut self.buffers[Self::index_of(id)]
    }

    /// Slot at a raw index (wraps)
    #[inline]
    pub fn get(&self, index: usize) -> &DmaBuffer<BUF_SIZE> {
        &self.buffers[index % SLOTS]
    }

    /// Number of slots currently owned by hardware
    pub fn in_flight(&self) -> usize {
        self.buffers.iter().filter(|b| b.is_used()).count()
    }

    /// Return every slot to software.
    ///
    /// Only valid once the hardware has been disabled, which aborts all
    /// outstanding transfers.
    pub fn release_all(&mut self) {
        for buffer in &mut self.buffers {
            buffer.release();
        }
    }

    /// Iterate over all slots
    pub fn iter(&self) -> impl Iterator<Item = &DmaBuffer<BUF_SIZE>> {
        self.buffers.iter()
    }

    /// Total memory usage in bytes.
    #[must_use]
    pub const fn memory_usage() -> usize {
        SLOTS * core::mem::size_of::<DmaBuffer<BUF_SIZE>>()
    }
}

impl<const SLOTS: usize, const BUF_SIZE: usize> Default for DmaBufferPool<SLOTS, BUF_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
