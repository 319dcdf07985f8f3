//! Configuration types and hardware description values.

use crate::internal::constants::{
    INTERFACE_REG_MIN_MAJOR, INTERFACE_REG_MIN_MINOR, MAX_TRANSFER_LEN, READ_POLL_INTERVAL_US,
    READ_TIMEOUT_US,
};
use crate::internal::register::dmac::{
    INTERFACE_BPB_DST_MASK, INTERFACE_BPB_DST_SHIFT, INTERFACE_BPB_SRC_MASK,
    INTERFACE_BPB_SRC_SHIFT, INTERFACE_TYPE_DST_MASK, INTERFACE_TYPE_DST_SHIFT,
    INTERFACE_TYPE_SRC_MASK, INTERFACE_TYPE_SRC_SHIFT, VERSION_MAJOR_MASK, VERSION_MAJOR_SHIFT,
    VERSION_MINOR_MASK, VERSION_MINOR_SHIFT, VERSION_PATCH_MASK, VERSION_PATCH_SHIFT,
    interface_type,
};

// =============================================================================
// Hardware Description
// =============================================================================

/// Core version decoded from the version register
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u8,
    /// Patch level
    pub patch: u8,
}

impl Version {
    /// Decode a raw version register value
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            major: ((raw & VERSION_MAJOR_MASK) >> VERSION_MAJOR_SHIFT) as u16,
            minor: ((raw & VERSION_MINOR_MASK) >> VERSION_MINOR_SHIFT) as u8,
            patch: ((raw & VERSION_PATCH_MASK) >> VERSION_PATCH_SHIFT) as u8,
        }
    }

    /// Whether this revision implements the interface description register
    ///
    /// Older 4.x revisions do not; any newer major version does.
    pub const fn has_interface_register(&self) -> bool {
        self.major > INTERFACE_REG_MIN_MAJOR
            || (self.major == INTERFACE_REG_MIN_MAJOR && self.minor >= INTERFACE_REG_MIN_MINOR)
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Bus type of one side of the DMA core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaType {
    /// AXI memory-mapped
    MemoryMapped,
    /// AXI stream
    Stream,
    /// FIFO
    Fifo,
    /// Reserved encoding
    Reserved,
}

impl DmaType {
    /// Decode a 2-bit interface type field
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            interface_type::MEMORY_MAP => DmaType::MemoryMapped,
            interface_type::STREAM => DmaType::Stream,
            interface_type::FIFO => DmaType::Fifo,
            _ => DmaType::Reserved,
        }
    }
}

/// Decoded interface description register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterfaceInfo {
    /// Destination side bus type
    pub dst_type: DmaType,
    /// Destination side bytes per beat (log2)
    pub dst_bytes_per_beat_log2: u8,
    /// Source side bus type
    pub src_type: DmaType,
    /// Source side bytes per beat (log2)
    pub src_bytes_per_beat_log2: u8,
}

impl InterfaceInfo {
    /// Decode a raw interface register value
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            dst_type: DmaType::from_bits((raw & INTERFACE_TYPE_DST_MASK) >> INTERFACE_TYPE_DST_SHIFT),
            dst_bytes_per_beat_log2: ((raw & INTERFACE_BPB_DST_MASK) >> INTERFACE_BPB_DST_SHIFT)
                as u8,
            src_type: DmaType::from_bits((raw & INTERFACE_TYPE_SRC_MASK) >> INTERFACE_TYPE_SRC_SHIFT),
            src_bytes_per_beat_log2: ((raw & INTERFACE_BPB_SRC_MASK) >> INTERFACE_BPB_SRC_SHIFT)
                as u8,
        }
    }

    /// Capabilities implied by this interface description
    ///
    /// Reading into memory needs a memory-mapped destination; writing from
    /// memory needs a memory-mapped source.
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities {
            read: matches!(self.dst_type, DmaType::MemoryMapped),
            write: matches!(self.src_type, DmaType::MemoryMapped),
        }
    }
}

/// Transfer directions supported by the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// Inbound transfers (peripheral to memory)
    pub read: bool,
    /// Outbound transfers (memory to peripheral)
    pub write: bool,
}

impl Capabilities {
    /// Both directions supported (assumed for revisions without an interface register)
    pub const BOTH: Self = Self {
        read: true,
        write: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::BOTH
    }
}

// =============================================================================
// Driver Configuration
// =============================================================================

/// DMAC driver configuration
///
/// # Example
/// ```ignore
/// let config = DmacConfig::rx()
///     .with_max_transfer_len(2048)
///     .with_bus_offset(0x4000_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmacConfig {
    /// Per-slot transfer length; clamped to the pool buffer size and `MAX_TRANSFER_LEN`
    pub max_transfer_len: usize,
    /// Added to host buffer addresses to form device-visible addresses
    pub bus_offset: u32,
    /// Fail construction if the hardware cannot read into memory
    pub require_read: bool,
    /// Fail construction if the hardware cannot write from memory
    pub require_write: bool,
    /// Timeout for [`Dmac::enqueue_read`](crate::Dmac::enqueue_read)
    pub read_timeout_us: u32,
    /// Poll interval for [`Dmac::enqueue_read`](crate::Dmac::enqueue_read)
    pub poll_interval_us: u32,
}

impl DmacConfig {
    /// Default configuration: no direction required, full-size buffers
    pub const fn new() -> Self {
        Self {
            max_transfer_len: MAX_TRANSFER_LEN,
            bus_offset: 0,
            require_read: false,
            require_write: false,
            read_timeout_us: READ_TIMEOUT_US,
            poll_interval_us: READ_POLL_INTERVAL_US,
        }
    }

    /// Configuration for an inbound (receive) engine
    pub const fn rx() -> Self {
        Self::new().with_require_read(true)
    }

    /// Configuration for an outbound (transmit) engine
    pub const fn tx() -> Self {
        Self::new().with_require_write(true)
    }

    /// Set the per-slot transfer length
    #[must_use]
    pub const fn with_max_transfer_len(mut self, len: usize) -> Self {
        self.max_transfer_len = len;
        self
    }

    /// Set the host-to-device address offset
    #[must_use]
    pub const fn with_bus_offset(mut self, offset: u32) -> Self {
        self.bus_offset = offset;
        self
    }

    /// Require read (inbound) support
    #[must_use]
    pub const fn with_require_read(mut self, required: bool) -> Self {
        self.require_read = required;
        self
    }

    /// Require write (outbound) support
    #[must_use]
    pub const fn with_require_write(mut self, required: bool) -> Self {
        self.require_write = required;
        self
    }

    /// Set the blocking read timeout and poll interval
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout_us: u32, poll_interval_us: u32) -> Self {
        self.read_timeout_us = timeout_us;
        self.poll_interval_us = poll_interval_us;
        self
    }
}

impl Default for DmacConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
