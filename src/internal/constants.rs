//! Centralized Constants
//!
//! Single source of truth for the limits and defaults used throughout the
//! AXI DMAC driver.
//!
//! # Note
//!
//! Register offsets and bit definitions live in `register/dmac.rs`, next to
//! the accessors that use them.

// =============================================================================
// Transfer IDs
// =============================================================================

/// Highest transfer ID the hardware hands out
pub const MAX_TRANSFER_ID: u8 = 30;

/// Size of the transfer ID space (`MAX_TRANSFER_ID + 1`)
pub const TRANSFER_ID_COUNT: usize = MAX_TRANSFER_ID as usize + 1;

// =============================================================================
// Buffer Sizes
// =============================================================================

/// Largest per-transfer length that is known not to straddle a 4 KiB boundary
pub const MAX_TRANSFER_LEN: usize = 0xF00;

/// Boundary a single transfer must not cross
pub const TRANSFER_BOUNDARY: usize = 4096;

/// Default number of buffer slots (one per hardware transfer ID)
pub const DEFAULT_SLOTS: usize = TRANSFER_ID_COUNT;

/// Default per-slot buffer size
pub const DEFAULT_BUFFER_SIZE: usize = MAX_TRANSFER_LEN;

// =============================================================================
// Timing
// =============================================================================

/// Default timeout for a blocking single read transfer
pub const READ_TIMEOUT_US: u32 = 100_000;

/// Poll interval while waiting for a blocking read to complete
pub const READ_POLL_INTERVAL_US: u32 = 10;

// =============================================================================
// Identification
// =============================================================================

/// Value of the identification register ("DMAC" in ASCII)
pub const DMAC_MAGIC: u32 = 0x444D_4143;

/// First major version with an interface description register
pub const INTERFACE_REG_MIN_MAJOR: u16 = 4;

/// First minor version (of `INTERFACE_REG_MIN_MAJOR`) with an interface register
pub const INTERFACE_REG_MIN_MINOR: u8 = 4;
