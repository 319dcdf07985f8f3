//! Testing utilities and mock implementations
//!
//! This module provides mock implementations for testing the DMAC driver
//! on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use crate::driver::interrupt::InterruptLine;
use crate::internal::constants::{DMAC_MAGIC, MAX_TRANSFER_ID};
use crate::internal::register::RegisterAccess;
use crate::internal::register::dmac::{
    CONTROL_ENABLE, CONTROL_OFFSET, DEST_ADDRESS_OFFSET, IDENTIFICATION_OFFSET, INTERFACE_OFFSET,
    IRQ_STATUS_OFFSET, IRQ_TRANSFER_COMPLETED, PERIPHERAL_ID_OFFSET, SRC_ADDRESS_OFFSET,
    TRANSFER_DONE_OFFSET, TRANSFER_ID_OFFSET, TRANSFER_LENGTH_OFFSET, TRANSFER_SUBMIT_OFFSET,
    TRANSFER_SUBMIT_QUEUE, VERSION_OFFSET,
};

// =============================================================================
// Mock DMAC
// =============================================================================

/// Version reported by default (4.4.a, has an interface register)
pub const MOCK_VERSION: u32 = 0x0004_0461;

/// Interface reported by default: memory-mapped on both sides, 8 bytes/beat
pub const MOCK_INTERFACE: u32 = 0x0303;

/// A transfer the simulated core accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub id: u32,
    /// Length in bytes (register value plus one)
    pub length: u32,
    pub src: u32,
    pub dest: u32,
}

#[derive(Debug)]
struct SimState {
    registers: HashMap<usize, u32>,
    next_id: u32,
    submit_pending: bool,
    done: u32,
    irq_status: u32,
    auto_accept: bool,
    auto_complete: bool,
    accept_after_polls: Option<u32>,
    polls_left: u32,
    pending_polls: u32,
    outstanding: Vec<u32>,
    accepted: Vec<Accepted>,
    write_log: Vec<(usize, u32)>,
}

impl SimState {
    fn reg(&self, offset: usize) -> u32 {
        self.registers.get(&offset).copied().unwrap_or(0)
    }

    fn accept(&mut self) -> Option<u32> {
        if !self.submit_pending {
            return None;
        }
        let id = self.next_id & 0x1F;
        self.submit_pending = false;
        self.done &= !(1 << id);
        self.next_id = if id >= MAX_TRANSFER_ID as u32 { 0 } else { id + 1 };
        self.accepted.push(Accepted {
            id,
            length: self.reg(TRANSFER_LENGTH_OFFSET) + 1,
            src: self.reg(SRC_ADDRESS_OFFSET),
            dest: self.reg(DEST_ADDRESS_OFFSET),
        });
        self.outstanding.push(id);
        if self.auto_complete {
            self.complete(id);
        }
        Some(id)
    }

    /// Submit register read: counts down to a delayed acceptance
    fn poll_submit(&mut self) -> bool {
        if self.submit_pending {
            self.pending_polls += 1;
            if self.accept_after_polls.is_some() {
                if self.polls_left == 0 {
                    self.accept();
                } else {
                    self.polls_left -= 1;
                }
            }
        }
        self.submit_pending
    }

    fn complete(&mut self, id: u32) {
        self.outstanding.retain(|&pending| pending != id);
        self.done |= 1 << id;
        self.irq_status |= IRQ_TRANSFER_COMPLETED;
    }

    fn abort(&mut self) {
        self.outstanding.clear();
        self.submit_pending = false;
        self.next_id = 0;
        self.done = 0;
    }
}

/// Simulated AXI DMAC register file
///
/// Clones share state, so a test keeps one handle while the driver owns
/// another.
///
/// Behaviour:
/// - Writing the submit bit queues the programmed transfer. With auto-accept
///   (the default) it is accepted immediately: it gets the next ID, that ID's
///   done bit clears and the submit bit drops. Otherwise the submit bit stays
///   set until [`accept_pending`](Self::accept_pending).
/// - IDs run `0..=30` and wrap.
/// - With [`set_accept_after_polls`](Self::set_accept_after_polls) the
///   submit bit clears after a number of reads, as if hardware caught up.
/// - Clearing the enable bit aborts everything and resets the ID counter.
/// - The IRQ status register is write-1-to-clear.
///
/// # Example
///
/// ```ignore
/// let mock = MockDmac::new();
/// let mut dmac = Dmac::new(mock.clone(), NoInterruptLine, &mut pool, config)?;
/// dmac.enqueue_write(fill, false)?;
/// mock.complete(0);
/// assert_eq!(dmac.harvest(|_| {}), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockDmac {
    state: Rc<RefCell<SimState>>,
}

impl MockDmac {
    /// Create a mock DMAC with valid identification and both directions
    pub fn new() -> Self {
        let mut registers = HashMap::new();
        registers.insert(IDENTIFICATION_OFFSET, DMAC_MAGIC);
        registers.insert(VERSION_OFFSET, MOCK_VERSION);
        registers.insert(INTERFACE_OFFSET, MOCK_INTERFACE);

        Self {
            state: Rc::new(RefCell::new(SimState {
                registers,
                next_id: 0,
                submit_pending: false,
                done: 0,
                irq_status: 0,
                auto_accept: true,
                auto_complete: false,
                accept_after_polls: None,
                polls_left: 0,
                pending_polls: 0,
                outstanding: Vec::new(),
                accepted: Vec::new(),
                write_log: Vec::new(),
            })),
        }
    }

    /// Set a plain register value
    pub fn set_register(&self, offset: usize, value: u32) {
        self.state.borrow_mut().registers.insert(offset, value);
    }

    /// Current value of a register, as the driver would read it
    pub fn register(&self, offset: usize) -> u32 {
        self.read(offset)
    }

    pub fn set_identification(&self, value: u32) {
        self.set_register(IDENTIFICATION_OFFSET, value);
    }

    pub fn set_version(&self, value: u32) {
        self.set_register(VERSION_OFFSET, value);
    }

    pub fn set_peripheral_id(&self, value: u32) {
        self.set_register(PERIPHERAL_ID_OFFSET, value);
    }

    pub fn set_interface(&self, value: u32) {
        self.set_register(INTERFACE_OFFSET, value);
    }

    /// Accept submissions as soon as they are written
    pub fn set_auto_accept(&self, enabled: bool) {
        self.state.borrow_mut().auto_accept = enabled;
    }

    /// Complete transfers as soon as they are accepted
    pub fn set_auto_complete(&self, enabled: bool) {
        self.state.borrow_mut().auto_complete = enabled;
    }

    /// Force the submit-pending bit
    pub fn set_submit_pending(&self, pending: bool) {
        self.state.borrow_mut().submit_pending = pending;
    }

    pub fn submit_pending(&self) -> bool {
        self.state.borrow().submit_pending
    }

    /// Accept each submission only after the submit bit has been read
    /// `polls` times while pending (disables auto-accept)
    pub fn set_accept_after_polls(&self, polls: u32) {
        let mut state = self.state.borrow_mut();
        state.auto_accept = false;
        state.accept_after_polls = Some(polls);
    }

    /// Reads of the submit register that saw it pending
    pub fn pending_polls(&self) -> u32 {
        self.state.borrow().pending_polls
    }

    /// Accept a pending submission, returning its ID
    pub fn accept_pending(&self) -> Option<u32> {
        self.state.borrow_mut().accept()
    }

    /// Overwrite the raw transfer ID register
    pub fn force_next_id(&self, raw: u32) {
        self.state.borrow_mut().next_id = raw;
    }

    /// Mark transfer `id` done and raise the completed status bit
    pub fn complete(&self, id: u32) {
        self.state.borrow_mut().complete(id);
    }

    /// Complete every accepted transfer that is still outstanding
    pub fn complete_all(&self) {
        let mut state = self.state.borrow_mut();
        let outstanding = core::mem::take(&mut state.outstanding);
        for id in outstanding {
            state.complete(id);
        }
    }

    pub fn irq_status_raw(&self) -> u32 {
        self.state.borrow().irq_status
    }

    /// Every transfer accepted so far, oldest first
    pub fn accepted(&self) -> Vec<Accepted> {
        self.state.borrow().accepted.clone()
    }

    /// Every register write so far: (offset, value)
    pub fn get_writes(&self) -> Vec<(usize, u32)> {
        self.state.borrow().write_log.clone()
    }

    /// Clear the write log
    pub fn clear_writes(&self) {
        self.state.borrow_mut().write_log.clear();
    }
}

impl Default for MockDmac {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAccess for MockDmac {
    fn read(&self, offset: usize) -> u32 {
        if offset == TRANSFER_SUBMIT_OFFSET {
            return u32::from(self.state.borrow_mut().poll_submit());
        }
        let state = self.state.borrow();
        match offset {
            TRANSFER_ID_OFFSET => state.next_id,
            TRANSFER_DONE_OFFSET => state.done,
            IRQ_STATUS_OFFSET => state.irq_status,
            _ => state.reg(offset),
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut state = self.state.borrow_mut();
        state.write_log.push((offset, value));
        match offset {
            TRANSFER_SUBMIT_OFFSET => {
                if value & TRANSFER_SUBMIT_QUEUE != 0 {
                    state.submit_pending = true;
                    state.polls_left = state.accept_after_polls.unwrap_or(0);
                    if state.auto_accept {
                        state.accept();
                    }
                }
            }
            IRQ_STATUS_OFFSET => state.irq_status &= !value,
            TRANSFER_ID_OFFSET | TRANSFER_DONE_OFFSET => {}
            CONTROL_OFFSET => {
                let was_enabled = state.reg(CONTROL_OFFSET) & CONTROL_ENABLE != 0;
                if was_enabled && value & CONTROL_ENABLE == 0 {
                    state.abort();
                }
                state.registers.insert(offset, value);
            }
            _ => {
                state.registers.insert(offset, value);
            }
        }
    }
}

// =============================================================================
// Mock Interrupt Line
// =============================================================================

/// Mock interrupt line counting acknowledgements
#[derive(Debug, Clone, Default)]
pub struct MockIrqLine {
    acks: Rc<Cell<usize>>,
    sink: Rc<Cell<Option<u32>>>,
}

impl MockIrqLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of end-of-interrupt signals
    pub fn acks(&self) -> usize {
        self.acks.get()
    }

    /// Last registered sink
    pub fn sink(&self) -> Option<u32> {
        self.sink.get()
    }
}

impl InterruptLine for MockIrqLine {
    type Sink = u32;

    fn register_sink(&mut self, sink: Self::Sink) {
        self.sink.set(Some(sink));
    }

    fn acknowledge(&mut self) {
        self.acks.set(self.acks.get() + 1);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that a DMAC register was written with a specific value
#[macro_export]
macro_rules! assert_reg_written {
    ($mock:expr, $offset:expr, $value:expr) => {
        let writes = $mock.get_writes();
        assert!(
            writes.iter().any(|w| w.0 == $offset && w.1 == $value),
            "Expected write to register {:#05x} with value {:#010x}, but got: {:?}",
            $offset,
            $value,
            writes
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_accept_assigns_sequential_ids_and_wraps() {
        let mut mock = MockDmac::new();
        mock.force_next_id(29);

        for _ in 0..3 {
            mock.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
        }
        let ids: Vec<u32> = mock.accepted().iter().map(|t| t.id).collect();
        assert_eq!(ids, [29, 30, 0]);
        assert_eq!(mock.read(TRANSFER_ID_OFFSET), 1);
    }

    #[test]
    fn accepting_an_id_clears_its_done_bit() {
        let mut mock = MockDmac::new();
        mock.complete(0);
        assert_eq!(mock.read(TRANSFER_DONE_OFFSET), 1);

        mock.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
        assert_eq!(mock.read(TRANSFER_DONE_OFFSET), 0);
    }

    #[test]
    fn manual_accept_holds_submit_bit() {
        let mut mock = MockDmac::new();
        mock.set_auto_accept(false);

        mock.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
        assert_eq!(mock.read(TRANSFER_SUBMIT_OFFSET), 1);
        assert_eq!(mock.accept_pending(), Some(0));
        assert_eq!(mock.read(TRANSFER_SUBMIT_OFFSET), 0);
        assert_eq!(mock.accept_pending(), None);
    }

    #[test]
    fn delayed_accept_counts_submit_polls() {
        let mut mock = MockDmac::new();
        mock.set_accept_after_polls(2);

        mock.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
        assert_eq!(mock.read(TRANSFER_SUBMIT_OFFSET), 1);
        assert_eq!(mock.read(TRANSFER_SUBMIT_OFFSET), 1);
        assert_eq!(mock.read(TRANSFER_SUBMIT_OFFSET), 0);
        assert_eq!(mock.pending_polls(), 3);
        assert_eq!(mock.accepted().len(), 1);
    }

    #[test]
    fn irq_status_is_write_one_to_clear() {
        let mut mock = MockDmac::new();
        mock.complete(3);
        assert_eq!(mock.read(IRQ_STATUS_OFFSET), IRQ_TRANSFER_COMPLETED);

        mock.write(IRQ_STATUS_OFFSET, 0);
        assert_eq!(mock.read(IRQ_STATUS_OFFSET), IRQ_TRANSFER_COMPLETED);
        mock.write(IRQ_STATUS_OFFSET, IRQ_TRANSFER_COMPLETED);
        assert_eq!(mock.read(IRQ_STATUS_OFFSET), 0);
    }

    #[test]
    fn disable_aborts_outstanding_transfers() {
        let mut mock = MockDmac::new();
        mock.write(CONTROL_OFFSET, CONTROL_ENABLE);
        mock.write(TRANSFER_SUBMIT_OFFSET, TRANSFER_SUBMIT_QUEUE);
        mock.complete(0);

        mock.write(CONTROL_OFFSET, 0);
        assert_eq!(mock.read(TRANSFER_ID_OFFSET), 0);
        assert_eq!(mock.read(TRANSFER_DONE_OFFSET), 0);

        mock.complete_all();
        assert_eq!(mock.read(TRANSFER_DONE_OFFSET), 0);
    }

    #[test]
    fn write_log_records_offsets() {
        let mut mock = MockDmac::new();
        mock.write(TRANSFER_LENGTH_OFFSET, 63);
        crate::assert_reg_written!(mock, TRANSFER_LENGTH_OFFSET, 63);

        mock.clear_writes();
        assert!(mock.get_writes().is_empty());
    }

    #[test]
    fn mock_delay_accumulates() {
        use embedded_hal::delay::DelayNs;

        let mut delay = MockDelay::new();
        delay.delay_us(10);
        delay.delay_ns(500);
        assert_eq!(delay.total_ns(), 10_500);
        assert_eq!(delay.total_us(), 10);
    }
}
