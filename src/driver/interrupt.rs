//! Interrupt status handling for the AXI DMAC.
//!
//! This module provides the [`IrqStatus`] structure for parsing the DMAC
//! interrupt status register and the [`InterruptLine`] trait through which
//! the platform's interrupt controller is reached.

use crate::internal::register::dmac::{IRQ_TRANSFER_COMPLETED, IRQ_TRANSFER_QUEUED};

// =============================================================================
// Interrupt Status
// =============================================================================

/// Interrupt flags parsed from the IRQ status (or mask) register.
///
/// # Example
///
/// ```ignore
/// let status = dmac.irq_status();
/// if status.completed {
///     dmac.harvest(|data| handle(data));
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqStatus {
    /// A queued transfer was accepted by the hardware
    pub queued: bool,
    /// At least one transfer completed
    pub completed: bool,
}

impl IrqStatus {
    /// Only the completion interrupt
    pub const COMPLETED: Self = Self {
        queued: false,
        completed: true,
    };

    /// Create from a raw status register value
    #[inline]
    pub fn from_raw(status: u32) -> Self {
        Self {
            queued: (status & IRQ_TRANSFER_QUEUED) != 0,
            completed: (status & IRQ_TRANSFER_COMPLETED) != 0,
        }
    }

    /// Convert to raw value for clearing (write-1-to-clear)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.queued {
            val |= IRQ_TRANSFER_QUEUED;
        }
        if self.completed {
            val |= IRQ_TRANSFER_COMPLETED;
        }
        val
    }

    /// Check if any interrupt is flagged
    #[inline]
    pub fn any(&self) -> bool {
        self.queued || self.completed
    }
}

// =============================================================================
// Interrupt Line
// =============================================================================

/// Connection to the platform interrupt controller for one DMAC instance.
///
/// The driver calls [`acknowledge`](Self::acknowledge) once it has cleared
/// the device-side status and drained completions, so the line can be
/// re-armed for the next event.
pub trait InterruptLine {
    /// Handler type invoked by the platform when the line fires
    type Sink;

    /// Install the handler for this line
    fn register_sink(&mut self, sink: Self::Sink);

    /// Signal end-of-interrupt to the controller
    fn acknowledge(&mut self);
}

/// Interrupt line for polled operation or platforms that route the IRQ
/// elsewhere. Registration and acknowledgement do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterruptLine;

impl InterruptLine for NoInterruptLine {
    type Sink = ();

    #[inline]
    fn register_sink(&mut self, _sink: Self::Sink) {}

    #[inline]
    fn acknowledge(&mut self) {}
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::register::dmac::IRQ_ALL;

    #[test]
    fn from_raw_parses_both_bits() {
        let status = IrqStatus::from_raw(IRQ_ALL);
        assert!(status.queued);
        assert!(status.completed);

        let status = IrqStatus::from_raw(IRQ_TRANSFER_COMPLETED);
        assert!(!status.queued);
        assert!(status.completed);
    }

    #[test]
    fn from_raw_ignores_unknown_bits() {
        let status = IrqStatus::from_raw(0xFFFF_FFFC);
        assert!(!status.any());
    }

    #[test]
    fn to_raw_round_trips_flags() {
        assert_eq!(IrqStatus::COMPLETED.to_raw(), IRQ_TRANSFER_COMPLETED);
        assert_eq!(IrqStatus::from_raw(IRQ_ALL).to_raw(), IRQ_ALL);
        assert_eq!(IrqStatus::default().to_raw(), 0);
    }

    #[test]
    fn no_interrupt_line_is_inert() {
        let mut line = NoInterruptLine;
        line.register_sink(());
        line.acknowledge();
    }
}
