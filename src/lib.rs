//! AXI DMAC Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the Analog Devices AXI DMA
//! controller (AXI DMAC), the soft-IP DMA engine used to move sample data
//! between FPGA converters and system memory.
//!
//! # Architecture
//!
//! The driver is organized into three parts:
//!
//! 1. **Buffer Pool** ([`dma`]): statically allocated, page-aligned transfer
//!    buffers, one slot per hardware transfer ID
//! 2. **Transfer Engine** ([`Dmac::enqueue_write`], [`Dmac::enqueue_read`]):
//!    submits transfers through the hardware queue
//! 3. **Completion Tracker** ([`Dmac::harvest`], [`Dmac::service_interrupt`]):
//!    scans the transfer-done mask in submission order and recycles slots
//!
//! Register access goes through [`RegisterAccess`], with [`Mmio`] for real
//! hardware. The platform interrupt controller is reached through
//! [`InterruptLine`].
//!
//! # Features
//!
//! - `defmt`: Log through `defmt` and derive `defmt::Format` for public types
//! - `log`: Log through the `log` facade (ignored when `defmt` is enabled)
//! - `critical-section`: Enable the ISR-safe [`SharedDmac`] wrapper
//! - `async`: Enable `SharedDmac::wait_for_completions`
//!
//! # Example
//!
//! ```ignore
//! use axi_dmac::{Dmac, DmacConfig, DmaBufferPoolDefault, Mmio, NoInterruptLine};
//!
//! #[unsafe(link_section = ".dma")]
//! static mut POOL: DmaBufferPoolDefault = DmaBufferPoolDefault::new();
//!
//! let regs = unsafe { Mmio::new(0x7C42_0000) };
//! let pool = unsafe { &mut *core::ptr::addr_of_mut!(POOL) };
//! let mut dmac = Dmac::new(regs, NoInterruptLine, pool, DmacConfig::tx())?;
//!
//! dmac.enqueue_write(|buf| {
//!     buf[..4].copy_from_slice(&[1, 2, 3, 4]);
//!     4
//! }, true)?;
//!
//! dmac.harvest(|_| {});
//! ```
//!
//! # Memory Requirements
//!
//! With the default configuration (31 slots, 0xF00 bytes each) every slot
//! occupies one 4 KiB page: 124 KiB of DMA-capable memory.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here and in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

// Logging macros; must come first so later modules can import them
mod fmt;

pub mod dma;
pub mod driver;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use dma::{DmaBuffer, DmaBufferPool, DoneMask, SlotState, TransferId};
pub use driver::config::{Capabilities, DmaType, DmacConfig, InterfaceInfo, Version};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result,
};
pub use driver::interrupt::{InterruptLine, IrqStatus, NoInterruptLine};
pub use driver::Dmac;
pub use internal::register::{Mmio, RegisterAccess};

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants: the buffer pool's view
/// of which slots hardware owns is only kept consistent by [`Dmac`].
pub mod unsafe_registers {
    pub use crate::internal::register::dmac::DmacRegs;
}

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Buffer pool
        DEFAULT_BUFFER_SIZE,
        DEFAULT_SLOTS,
        // Identification
        DMAC_MAGIC,
        // Transfer IDs
        MAX_TRANSFER_ID,
        // Transfer limits
        MAX_TRANSFER_LEN,
        // Timing
        READ_POLL_INTERVAL_US,
        READ_TIMEOUT_US,
        TRANSFER_BOUNDARY,
        TRANSFER_ID_COUNT,
    };
}

/// Buffer pool sized to the full transfer ID space with maximum-length buffers
pub type DmaBufferPoolDefault =
    DmaBufferPool<{ constants::DEFAULT_SLOTS }, { constants::DEFAULT_BUFFER_SIZE }>;

/// Driver over a [`DmaBufferPoolDefault`]
pub type DmacDefault<'p, R, L> =
    Dmac<'p, R, L, { constants::DEFAULT_SLOTS }, { constants::DEFAULT_BUFFER_SIZE }>;

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedDmac;
