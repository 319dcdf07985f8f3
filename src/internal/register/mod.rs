//! Memory-mapped register access for the AXI DMAC
//!
//! The register file is reached through the [`RegisterAccess`] trait so the
//! driver core can run against real MMIO ([`Mmio`]) or a simulated register
//! file in host tests. All hardware access is volatile.

pub mod dmac;

/// Backend for 32-bit register reads and writes at byte offsets
///
/// Offsets are relative to the start of the DMAC register window.
pub trait RegisterAccess {
    /// Read the 32-bit register at `offset`
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the 32-bit register at `offset`
    fn write(&mut self, offset: usize, value: u32);
}

/// Volatile MMIO window starting at a fixed base address
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create an MMIO window at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the mapped, 4-byte aligned start of an AXI DMAC
    /// register window, and no other code may drive the same window.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the window
    #[inline(always)]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `Mmio::new` guarantees the window is mapped and exclusive
        unsafe { read_reg(self.base + offset) }
    }

    #[inline(always)]
    fn write(&mut self, offset: usize, value: u32) {
        // SAFETY: `Mmio::new` guarantees the window is mapped and exclusive
        unsafe { write_reg(self.base + offset, value) }
    }
}

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterAccess> DmacRegs<R> {
///     reg_rw!(control, set_control, CONTROL_OFFSET, "Control register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&mut self, value: u32) {
            self.bus.write($offset, value)
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            self.bus.read($offset)
        }
    };
}

/// Generate set/clear bit operation methods for a register.
///
/// # Example
/// ```ignore
/// impl<R: RegisterAccess> DmacRegs<R> {
///     reg_bit_ops!(enable, disable, CONTROL_OFFSET, CONTROL_ENABLE,
///                  "the DMA core", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $offset:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn(&mut self) {
            let value = self.bus.read($offset);
            self.bus.write($offset, value | $bit);
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn(&mut self) {
            let value = self.bus.read($offset);
            self.bus.write($offset, value & !$bit);
        }
    };
}

/// Generate a bit check method (true when bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $offset:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn(&self) -> bool {
            (self.bus.read($offset) & $bit) != 0
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
