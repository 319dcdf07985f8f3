//! Synchronization and Concurrency Support
//!
//! ISR-safe access to a [`Dmac`](crate::Dmac) that is driven from both thread
//! mode and the DMAC interrupt handler:
//!
//! - **Primitives** (`primitives`): Low-level synchronization types
//!   - [`CriticalSectionCell`] - ISR-safe interior mutability
//!   - `AtomicWaker` - Async waker storage for interrupts (`async` only)
//!
//! - **Shared Wrapper** (`shared`): [`SharedDmac`], a critical-section
//!   protected slot the driver is installed into after construction
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//! - `async`: Adds `SharedDmac::wait_for_completions`
//!
//! # Example
//!
//! ```ignore
//! use axi_dmac::sync::SharedDmac;
//!
//! static DMAC: SharedDmac<'static, Mmio, NoInterruptLine, 31, 0xF00> = SharedDmac::new();
//!
//! fn main() {
//!     let regs = unsafe { Mmio::new(DMAC_BASE) };
//!     DMAC.install(Dmac::new(regs, NoInterruptLine, pool, DmacConfig::tx()).unwrap());
//! }
//!
//! #[interrupt]
//! fn DMAC_IRQ() {
//!     DMAC.on_interrupt(|_| {});
//! }
//! ```

mod primitives;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedDmac;
