//! Error types for the AXI DMAC driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Construction and capability failures
//! - [`DmaError`]: Transfer submission failures
//! - [`IoError`]: Runtime waits that did not complete
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by driver methods that can fail in more than one domain.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Construction and capability errors
///
/// A [`Dmac`](crate::Dmac) is never created when one of these occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Identification register did not hold the DMAC signature
    IdentificationFailed,
    /// Read (inbound) transfers required but not supported by the hardware
    ReadNotSupported,
    /// Write (outbound) transfers required but not supported by the hardware
    WriteNotSupported,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::IdentificationFailed => "DMAC identification failed",
            ConfigError::ReadNotSupported => "read transfers not supported",
            ConfigError::WriteNotSupported => "write transfers not supported",
            ConfigError::InvalidConfig => "invalid configuration",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// Transfer submission errors
///
/// None of these change the ownership state of a buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// Transfer direction unavailable on this hardware
    NotSupported,
    /// Previous queuing operation not yet accepted, or the slot is still in flight
    QueueFull,
    /// Requested or produced length exceeds the slot capacity
    BufferExceeded,
    /// Hardware reported an invalid next transfer ID
    DeviceError,
    /// Zero-length transfer
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::NotSupported => "transfer direction not supported",
            DmaError::QueueFull => "transfer queue full",
            DmaError::BufferExceeded => "buffer capacity exceeded",
            DmaError::DeviceError => "invalid transfer ID from device",
            DmaError::InvalidLength => "invalid transfer length",
        }
    }

    /// Whether retrying the same call later may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, DmaError::QueueFull | DmaError::DeviceError)
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime wait errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Operation timed out
    Timeout,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::IdentificationFailed)) => { /* ... */ }
///     Err(Error::Dma(DmaError::QueueFull)) => { /* retry later */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
