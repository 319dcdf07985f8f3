//! Core driver components for the AXI DMAC peripheral.
//!
//! - [`config`] - Identification, capabilities and driver configuration
//! - [`error`] - Error types and result aliases
//! - [`interrupt`] - Interrupt status and the platform interrupt-line seam
//! - [`Dmac`] - The transfer engine and completion tracker
//!
//! # Example
//!
//! ```ignore
//! use axi_dmac::driver::{Dmac, DmacConfig, NoInterruptLine};
//!
//! let config = DmacConfig::tx().with_max_transfer_len(2048);
//! let mut dmac = Dmac::new(regs, NoInterruptLine, pool, config)?;
//! ```

pub mod config;
pub mod error;
pub mod interrupt;

mod completion;
mod dmac;

pub use config::{Capabilities, DmaType, DmacConfig, InterfaceInfo, Version};
pub use dmac::Dmac;
pub use error::{ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, Result};
pub use interrupt::{InterruptLine, IrqStatus, NoInterruptLine};
