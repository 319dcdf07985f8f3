//! AXI DMAC Register Definitions
//!
//! The DMAC moves data between a peripheral interface and memory. Transfers
//! are queued by programming length and address registers and setting the
//! submit bit; the hardware assigns each queued transfer an ID and reports its
//! completion through the transfer-done bitmask.

use super::{RegisterAccess, reg_bit_check, reg_bit_ops, reg_ro, reg_rw};

// =============================================================================
// Register Offsets
// =============================================================================

/// Version Register offset
pub const VERSION_OFFSET: usize = 0x000;
/// Peripheral ID Register offset
pub const PERIPHERAL_ID_OFFSET: usize = 0x004;
/// Identification Register offset
pub const IDENTIFICATION_OFFSET: usize = 0x00C;
/// Interface Description Register offset (version >= 4.4)
pub const INTERFACE_OFFSET: usize = 0x010;
/// IRQ Mask Register offset
pub const IRQ_MASK_OFFSET: usize = 0x080;
/// IRQ Pending/Status Register offset (write 1 to clear)
pub const IRQ_STATUS_OFFSET: usize = 0x084;
/// Control Register offset
pub const CONTROL_OFFSET: usize = 0x400;
/// Transfer ID Register offset
pub const TRANSFER_ID_OFFSET: usize = 0x404;
/// Transfer Submit Register offset
pub const TRANSFER_SUBMIT_OFFSET: usize = 0x408;
/// Transfer Flags Register offset
pub const FLAGS_OFFSET: usize = 0x40C;
/// Transfer Destination Address Register offset
pub const DEST_ADDRESS_OFFSET: usize = 0x410;
/// Transfer Source Address Register offset
pub const SRC_ADDRESS_OFFSET: usize = 0x414;
/// Transfer Length Register offset (bytes minus one)
pub const TRANSFER_LENGTH_OFFSET: usize = 0x418;
/// Transfer Done Register offset (one bit per transfer ID)
pub const TRANSFER_DONE_OFFSET: usize = 0x428;
/// Transfer Progress Register offset
pub const TRANSFER_PROGRESS_OFFSET: usize = 0x448;

// =============================================================================
// Version Register Fields
// =============================================================================

/// Patch level shift
pub const VERSION_PATCH_SHIFT: u32 = 0;
/// Patch level mask
pub const VERSION_PATCH_MASK: u32 = 0xFF;
/// Minor version shift
pub const VERSION_MINOR_SHIFT: u32 = 8;
/// Minor version mask
pub const VERSION_MINOR_MASK: u32 = 0xFF << 8;
/// Major version shift
pub const VERSION_MAJOR_SHIFT: u32 = 16;
/// Major version mask
pub const VERSION_MAJOR_MASK: u32 = 0xFFFF << 16;

// =============================================================================
// Interface Register Fields
// =============================================================================

/// Destination bytes-per-beat (log2) shift
pub const INTERFACE_BPB_DST_SHIFT: u32 = 0;
/// Destination bytes-per-beat (log2) mask
pub const INTERFACE_BPB_DST_MASK: u32 = 0xF;
/// Destination interface type shift
pub const INTERFACE_TYPE_DST_SHIFT: u32 = 4;
/// Destination interface type mask
pub const INTERFACE_TYPE_DST_MASK: u32 = 0x3 << 4;
/// Source bytes-per-beat (log2) shift
pub const INTERFACE_BPB_SRC_SHIFT: u32 = 8;
/// Source bytes-per-beat (log2) mask
pub const INTERFACE_BPB_SRC_MASK: u32 = 0xF << 8;
/// Source interface type shift
pub const INTERFACE_TYPE_SRC_SHIFT: u32 = 12;
/// Source interface type mask
pub const INTERFACE_TYPE_SRC_MASK: u32 = 0x3 << 12;

/// Interface type values
pub mod interface_type {
    /// AXI memory-mapped
    pub const MEMORY_MAP: u32 = 0;
    /// AXI stream
    pub const STREAM: u32 = 1;
    /// FIFO
    pub const FIFO: u32 = 2;
}

// =============================================================================
// IRQ Mask / Status Bits
// =============================================================================

/// Transfer queued interrupt
pub const IRQ_TRANSFER_QUEUED: u32 = 1 << 0;
/// Transfer completed interrupt
pub const IRQ_TRANSFER_COMPLETED: u32 = 1 << 1;
/// All interrupt bits
pub const IRQ_ALL: u32 = IRQ_TRANSFER_QUEUED | IRQ_TRANSFER_COMPLETED;

// =============================================================================
// Control / Submit / Flags Bits
// =============================================================================

/// Enable the DMA core; clearing it aborts all outstanding transfers
pub const CONTROL_ENABLE: u32 = 1 << 0;
/// Pause the DMA core
pub const CONTROL_PAUSE: u32 = 1 << 1;

/// Next free transfer ID mask
///
/// Wide enough for the whole `0..=MAX_TRANSFER_ID` range so an out-of-range
/// value read from hardware is detectable.
pub const TRANSFER_ID_NEXT_MASK: u32 = 0x1F;

/// Queue the programmed transfer; cleared by hardware once accepted
pub const TRANSFER_SUBMIT_QUEUE: u32 = 1 << 0;

/// Cyclic transfer mode (bit 1 is TLAST, bit 2 partial reporting; both left as found)
pub const FLAGS_CYCLIC: u32 = 1 << 0;

/// Transfer progress byte count mask
pub const TRANSFER_PROGRESS_MASK: u32 = 0x00FF_FFFF;

// =============================================================================
// Register Block
// =============================================================================

/// Typed view of the DMAC register file over a [`RegisterAccess`] backend
#[derive(Debug)]
pub struct DmacRegs<R> {
    bus: R,
}

impl<R: RegisterAccess> DmacRegs<R> {
    /// Wrap a register backend
    pub const fn new(bus: R) -> Self {
        Self { bus }
    }

    /// Access the underlying backend
    pub fn bus(&self) -> &R {
        &self.bus
    }

    reg_ro!(version, VERSION_OFFSET, "Version register");
    reg_ro!(peripheral_id, PERIPHERAL_ID_OFFSET, "Peripheral ID register");
    reg_ro!(identification, IDENTIFICATION_OFFSET, "Identification register");
    reg_ro!(interface, INTERFACE_OFFSET, "Interface Description register");
    reg_rw!(irq_mask, set_irq_mask, IRQ_MASK_OFFSET, "IRQ Mask register");
    reg_rw!(irq_status, set_irq_status, IRQ_STATUS_OFFSET, "IRQ Status register");
    reg_rw!(control, set_control, CONTROL_OFFSET, "Control register");
    reg_rw!(flags, set_flags, FLAGS_OFFSET, "Transfer Flags register");
    reg_rw!(dest_address, set_dest_address, DEST_ADDRESS_OFFSET, "Transfer Destination Address register");
    reg_rw!(src_address, set_src_address, SRC_ADDRESS_OFFSET, "Transfer Source Address register");
    reg_rw!(transfer_length, set_transfer_length, TRANSFER_LENGTH_OFFSET, "Transfer Length register");
    reg_ro!(transfer_done, TRANSFER_DONE_OFFSET, "Transfer Done register");

    reg_bit_ops!(enable, disable, CONTROL_OFFSET, CONTROL_ENABLE, "the DMA core", "Enable", "Disable");
    reg_bit_ops!(pause, resume, CONTROL_OFFSET, CONTROL_PAUSE, "the DMA core", "Pause", "Resume");

    reg_bit_check!(is_enabled, CONTROL_OFFSET, CONTROL_ENABLE, "Check whether the DMA core is enabled");
    reg_bit_check!(is_paused, CONTROL_OFFSET, CONTROL_PAUSE, "Check whether the DMA core is paused");
    reg_bit_check!(
        submit_pending,
        TRANSFER_SUBMIT_OFFSET,
        TRANSFER_SUBMIT_QUEUE,
        "Check whether a queuing operation has not been accepted yet"
    );

    /// Next free transfer ID as reported by hardware
    #[inline(always)]
    pub fn next_transfer_id(&self) -> u32 {
        self.bus.read(TRANSFER_ID_OFFSET) & TRANSFER_ID_NEXT_MASK
    }

    /// Queue the programmed transfer
    #[inline(always)]
    pub fn queue_transfer(&mut self) {
        self.bus.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
    }

    /// Bytes transferred so far by the active transfer
    #[inline(always)]
    pub fn transfer_progress(&self) -> u32 {
        self.bus.read(TRANSFER_PROGRESS_OFFSET) & TRANSFER_PROGRESS_MASK
    }

    /// Program a transfer length in bytes (`len` must be non-zero)
    #[inline(always)]
    pub fn set_length_bytes(&mut self, len: usize) {
        self.set_transfer_length(len as u32 - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDmac;

    #[test]
    fn offsets_match_register_map() {
        assert_eq!(IDENTIFICATION_OFFSET, 0x00C);
        assert_eq!(CONTROL_OFFSET, 0x400);
        assert_eq!(TRANSFER_DONE_OFFSET, 0x428);
        assert_eq!(SRC_ADDRESS_OFFSET, 0x414);
        assert_eq!(DEST_ADDRESS_OFFSET, 0x410);
    }

    #[test]
    fn irq_bits_are_distinct() {
        assert_eq!(IRQ_TRANSFER_QUEUED & IRQ_TRANSFER_COMPLETED, 0);
        assert_eq!(IRQ_ALL, 0b11);
    }

    #[test]
    fn enable_and_pause_are_independent_bits() {
        let mut regs = DmacRegs::new(MockDmac::new());

        regs.enable();
        regs.pause();
        assert!(regs.is_enabled());
        assert!(regs.is_paused());

        regs.resume();
        assert!(regs.is_enabled());
        assert!(!regs.is_paused());

        regs.disable();
        assert!(!regs.is_enabled());
    }

    #[test]
    fn length_is_written_minus_one() {
        let mock = MockDmac::new();
        let mut regs = DmacRegs::new(mock.clone());

        regs.set_length_bytes(64);
        assert_eq!(mock.register(TRANSFER_LENGTH_OFFSET), 63);
    }

    #[test]
    fn next_transfer_id_is_masked() {
        let mock = MockDmac::new();
        mock.force_next_id(0xFFFF_FFE5);
        let regs = DmacRegs::new(mock);

        assert_eq!(regs.next_transfer_id(), 0x05);
    }
}
