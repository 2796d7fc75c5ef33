//! Millisecond clock sources.
//!
//! A [`Clock`] is the only way a [`Timer`](crate::time::Timer) learns what
//! time it is. Readings are a free-running `u32` count of milliseconds that
//! wraps back to zero after `u32::MAX`, like the `millis()` counter on most
//! microcontrollers.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;
use std::time::Instant;

/// Something that can be asked for the current tick count.
///
/// Reading the clock must not have side effects, since every timer sharing
/// it reads it independently.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

/// Wall clock backed by [`Instant`], counted from the first reading in the process
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        static EPOCH: OnceLock<Instant> = OnceLock::new();

        let millis = EPOCH.get_or_init(Instant::now).elapsed().as_millis();

        // Truncation is the wraparound.
        millis as u32
    }
}

/// Clock whose time only moves when told to
///
/// Clones share the same counter, so a test can keep one handle while a
/// timer owns another.
///
/// ```
/// use polltimer::time::{Clock, MockClock};
///
/// let clock = MockClock::new();
/// let handle = clock.clone();
///
/// handle.advance(250);
/// assert_eq!(clock.now_ms(), 250);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    current_ms: Rc<Cell<u32>>,
}

impl MockClock {
    /// Create a clock reading zero
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock reading `ms`
    pub fn starting_at(ms: u32) -> Self {
        Self {
            current_ms: Rc::new(Cell::new(ms)),
        }
    }

    /// Jump to an absolute reading
    pub fn set(&self, ms: u32) {
        self.current_ms.set(ms);
    }

    /// Move forward by `ms`, wrapping past `u32::MAX`
    pub fn advance(&self, ms: u32) {
        self.current_ms.set(self.current_ms.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.current_ms.get()
    }
}

/// Adapts any `Fn() -> u32` into a [`Clock`]
#[derive(Clone, Copy)]
pub struct FnClock<F> {
    read: F,
}

impl<F> FnClock<F>
where
    F: Fn() -> u32,
{
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F> Clock for FnClock<F>
where
    F: Fn() -> u32,
{
    fn now_ms(&self) -> u32 {
        (self.read)()
    }
}

impl<F> fmt::Debug for FnClock<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnClock").finish_non_exhaustive()
    }
}
