//! Short names for the common timer calls
//!
//! These map one to one onto [`Timer`] methods and add no state of their own.
//!
//! ```
//! use polltimer::shorthand::Shorthand;
//! use polltimer::time::{MockClock, Timer};
//!
//! let clock = MockClock::new();
//! let mut blink = Timer::with_clock(clock.clone(), 100);
//!
//! clock.advance(100);
//! assert!(blink.passed());
//! assert!(blink.ready());
//! assert_eq!(blink.elapsed(), 0);
//! ```

use crate::time::{Clock, ResetMode, Timer};

pub trait Shorthand {
    /// [`Timer::triggered`] with [`ResetMode::Restart`]
    fn ready(&mut self) -> bool;

    /// [`Timer::triggered`] with [`ResetMode::Keep`]
    fn passed(&mut self) -> bool;

    /// [`Timer::first_trigger`]
    fn once(&mut self) -> bool;

    /// [`Timer::time_since_last_reset`]
    fn elapsed(&self) -> u32;

    /// [`Timer::time_until_trigger`]
    fn remaining(&self) -> u32;

    /// [`Timer::reset`]
    fn restart(&mut self);

    /// [`Timer::negate_state`]
    fn toggle(&mut self);
}

impl<C: Clock> Shorthand for Timer<C> {
    fn ready(&mut self) -> bool {
        self.triggered(ResetMode::Restart)
    }

    fn passed(&mut self) -> bool {
        self.triggered(ResetMode::Keep)
    }

    fn once(&mut self) -> bool {
        self.first_trigger()
    }

    fn elapsed(&self) -> u32 {
        self.time_since_last_reset()
    }

    fn remaining(&self) -> u32 {
        self.time_until_trigger()
    }

    fn restart(&mut self) {
        self.reset()
    }

    fn toggle(&mut self) {
        self.negate_state()
    }
}
