//! ISR-safe DMAC wrapper using critical sections.
//!
//! Provides [`SharedDmac`], which lets thread-mode code and the DMAC interrupt
//! handler take turns driving one [`Dmac`].

#[cfg(feature = "async")]
use super::primitives::AtomicWaker;
use super::primitives::CriticalSectionCell;
use crate::driver::Dmac;
use crate::driver::interrupt::InterruptLine;
use crate::internal::register::RegisterAccess;

/// ISR-safe DMAC wrapper using critical sections.
///
/// The driver is installed after construction (construction can fail), so
/// the wrapper itself can be a `static`. All access goes through
/// `critical_section::with()`, disabling interrupts for the duration of the
/// closure.
///
/// # Example
///
/// ```ignore
/// static DMAC: SharedDmac<'static, Mmio, NoInterruptLine, 31, 0xF00> = SharedDmac::new();
///
/// DMAC.install(Dmac::new(regs, NoInterruptLine, pool, DmacConfig::rx())?);
/// DMAC.with(|dmac| dmac.enable_rx(0));
///
/// #[interrupt]
/// fn DMAC_IRQ() {
///     DMAC.on_interrupt(|data| forward(data));
/// }
/// ```
pub struct SharedDmac<'p, R, L, const SLOTS: usize, const BUF_SIZE: usize>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    inner: CriticalSectionCell<Option<Dmac<'p, R, L, SLOTS, BUF_SIZE>>>,
    #[cfg(feature = "async")]
    completions: CriticalSectionCell<usize>,
    #[cfg(feature = "async")]
    waker: AtomicWaker,
}

impl<'p, R, L, const SLOTS: usize, const BUF_SIZE: usize> SharedDmac<'p, R, L, SLOTS, BUF_SIZE>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    /// Create an empty wrapper (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
            #[cfg(feature = "async")]
            completions: CriticalSectionCell::new(0),
            #[cfg(feature = "async")]
            waker: AtomicWaker::new(),
        }
    }

    /// Install a driver, returning the previously installed one
    pub fn install(&self, dmac: Dmac<'p, R, L, SLOTS, BUF_SIZE>) -> Option<Dmac<'p, R, L, SLOTS, BUF_SIZE>> {
        self.inner.with(|slot| slot.replace(dmac))
    }

    /// Remove the installed driver
    pub fn take(&self) -> Option<Dmac<'p, R, L, SLOTS, BUF_SIZE>> {
        self.inner.with(Option::take)
    }

    /// Check whether a driver is installed
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` if no driver is installed.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Dmac<'p, R, L, SLOTS, BUF_SIZE>) -> T,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Try to execute a closure, returning `None` if already borrowed or
    /// nothing is installed.
    #[inline]
    pub fn try_with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Dmac<'p, R, L, SLOTS, BUF_SIZE>) -> T,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }

    /// Interrupt handler body
    ///
    /// Runs [`Dmac::service_interrupt`] on the installed driver. With the
    /// `async` feature, a non-empty harvest wakes
    /// [`wait_for_completions`](Self::wait_for_completions).
    pub fn on_interrupt<F>(&self, consume: F) -> Option<usize>
    where
        F: FnMut(&[u8]),
    {
        let harvested = self.with(|dmac| dmac.service_interrupt(consume)).flatten();

        #[cfg(feature = "async")]
        if let Some(count) = harvested.filter(|&count| count > 0) {
            self.completions.with(|pending| *pending += count);
            self.waker.wake();
        }

        harvested
    }

    /// Wait until at least one transfer has been harvested by
    /// [`on_interrupt`](Self::on_interrupt).
    ///
    /// Returns the number harvested since the previous wait.
    #[cfg(feature = "async")]
    pub async fn wait_for_completions(&self) -> usize {
        use core::future::poll_fn;
        use core::task::Poll;

        poll_fn(|cx| {
            let pending = self.completions.with(core::mem::take);
            if pending > 0 {
                return Poll::Ready(pending);
            }

            self.waker.register(cx.waker());
            // Re-check after registering so an interrupt in between is not lost
            match self.completions.with(core::mem::take) {
                0 => Poll::Pending,
                n => Poll::Ready(n),
            }
        })
        .await
    }
}

impl<R, L, const SLOTS: usize, const BUF_SIZE: usize> Default for SharedDmac<'_, R, L, SLOTS, BUF_SIZE>
where
    R: RegisterAccess,
    L: InterruptLine,
{
    fn default() -> Self {
        Self::new()
    }
}
